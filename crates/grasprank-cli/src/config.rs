mod defaults;

use crate::cli::{BatchArgs, RankArgs, RobustArgs};
use crate::error::{CliError, Result};
use defaults::DefaultsConfig;
use grasprank::core::simulator::cuboid::CuboidHand;
use grasprank::engine::config as core_config;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, Copy)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialWeights {
    sigma_min: Option<f64>,
    wrench_volume: Option<f64>,
    isotropy: Option<f64>,
}

/// Either a constant normalized value or the keyword `"reject"`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
enum PartialDegenerateRange {
    Constant(f64),
    Keyword(String),
}

impl PartialDegenerateRange {
    fn parse(value: &str) -> Self {
        value
            .parse()
            .map(Self::Constant)
            .unwrap_or_else(|_| Self::Keyword(value.to_string()))
    }

    fn resolve(self) -> Result<core_config::DegenerateRangePolicy> {
        match self {
            Self::Constant(value) => Ok(core_config::DegenerateRangePolicy::Constant(value)),
            Self::Keyword(keyword) if keyword == "reject" => {
                Ok(core_config::DegenerateRangePolicy::Reject)
            }
            Self::Keyword(other) => Err(CliError::Config(format!(
                "`scoring.degenerate-range` must be a number or \"reject\", got \"{}\"",
                other
            ))),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialScoringConfig {
    weights: Option<PartialWeights>,
    degenerate_range: Option<PartialDegenerateRange>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
enum PartialNormalization {
    PopulationRange,
    Raw,
}

impl FromStr for PartialNormalization {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "population-range" => Ok(Self::PopulationRange),
            "raw" => Ok(Self::Raw),
            _ => Err(()),
        }
    }
}

impl From<PartialNormalization> for core_config::PerturbationNormalization {
    fn from(p: PartialNormalization) -> Self {
        match p {
            PartialNormalization::PopulationRange => Self::PopulationRange,
            PartialNormalization::Raw => Self::Raw,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialPerturbationConfig {
    samples: Option<usize>,
    sigma_position: Option<f64>,
    sigma_angle: Option<f64>,
    normalization: Option<PartialNormalization>,
    seed: Option<u64>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SimulatorKind {
    /// Replay contacts recorded in the batch file.
    #[default]
    Replay,
    /// Close an analytic hand on a box centred at the object pose.
    Cuboid,
}

impl FromStr for SimulatorKind {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "replay" => Ok(Self::Replay),
            "cuboid" => Ok(Self::Cuboid),
            _ => Err(()),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialSimulatorConfig {
    #[serde(rename = "type")]
    kind: Option<SimulatorKind>,
    half_extents: Option<[f64; 3]>,
    fingers: Option<usize>,
    phalanges: Option<usize>,
    reach: Option<f64>,
    phalanx_spacing: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialOutputConfig {
    top: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialRunConfig {
    scoring: Option<PartialScoringConfig>,
    perturbation: Option<PartialPerturbationConfig>,
    simulator: Option<PartialSimulatorConfig>,
    output: Option<PartialOutputConfig>,
}

/// The contact simulator a run evaluates hypotheses with.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulatorSettings {
    Replay,
    Cuboid {
        half_extents: [f64; 3],
        hand: CuboidHand,
    },
}

impl SimulatorSettings {
    /// Whether the simulator's contacts depend on the hypothesis values. Replayed contacts are
    /// keyed by id only, so perturbed copies reproduce the nominal contacts.
    pub fn responds_to_perturbation(&self) -> bool {
        match self {
            SimulatorSettings::Replay => false,
            SimulatorSettings::Cuboid { .. } => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankRunConfig {
    pub ranking: core_config::RankingConfig,
    pub simulator: SimulatorSettings,
    pub top: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RobustRunConfig {
    pub ranking: core_config::RobustRankingConfig,
    pub simulator: SimulatorSettings,
    pub top: usize,
    pub seed: Option<u64>,
}

impl PartialRunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads the config file if one was given; otherwise every setting starts unset.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn merge_for_rank(mut self, args: &RankArgs) -> Result<RankRunConfig> {
        self.apply_set_values(&args.batch.set_values)?;
        let defaults = DefaultsConfig::default();

        let (weights, policy) = self.merge_scoring()?;
        let ranking = core_config::RankingConfigBuilder::new()
            .weights(weights)
            .degenerate_range(policy)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        Ok(RankRunConfig {
            ranking,
            simulator: self.merge_simulator(&defaults),
            top: self.merge_top(&args.batch, &defaults),
        })
    }

    pub fn merge_for_robust(mut self, args: &RobustArgs) -> Result<RobustRunConfig> {
        self.apply_set_values(&args.batch.set_values)?;
        let defaults = DefaultsConfig::default();

        let (weights, policy) = self.merge_scoring()?;
        let perturbation = self.perturbation.take().unwrap_or_default();

        let mut builder = core_config::RobustRankingConfigBuilder::new()
            .weights(weights)
            .degenerate_range(policy);
        if let Some(samples) = args.samples.or(perturbation.samples) {
            builder = builder.samples(samples);
        }
        if let Some(sigma) = args.sigma_position.or(perturbation.sigma_position) {
            builder = builder.sigma_position(sigma);
        }
        if let Some(sigma) = args.sigma_angle.or(perturbation.sigma_angle) {
            builder = builder.sigma_angle(sigma);
        }
        if args.raw {
            builder = builder.normalization(core_config::PerturbationNormalization::Raw);
        } else if let Some(normalization) = perturbation.normalization {
            builder = builder.normalization(normalization.into());
        }
        let ranking = builder
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        Ok(RobustRunConfig {
            ranking,
            simulator: self.merge_simulator(&defaults),
            top: self.merge_top(&args.batch, &defaults),
            seed: args.seed.or(perturbation.seed),
        })
    }

    fn merge_scoring(
        &mut self,
    ) -> Result<(core_config::MetricWeights, core_config::DegenerateRangePolicy)> {
        let scoring = self.scoring.take().unwrap_or_default();
        let partial = scoring.weights.unwrap_or_default();
        let defaults = core_config::MetricWeights::default();
        let weights = core_config::MetricWeights {
            sigma_min: partial.sigma_min.unwrap_or(defaults.sigma_min),
            wrench_volume: partial.wrench_volume.unwrap_or(defaults.wrench_volume),
            isotropy: partial.isotropy.unwrap_or(defaults.isotropy),
        };
        let policy = match scoring.degenerate_range {
            Some(partial) => partial.resolve()?,
            None => core_config::DegenerateRangePolicy::default(),
        };
        Ok((weights, policy))
    }

    fn merge_simulator(&mut self, defaults: &DefaultsConfig) -> SimulatorSettings {
        let simulator = self.simulator.take().unwrap_or_default();
        match simulator.kind.unwrap_or_default() {
            SimulatorKind::Replay => SimulatorSettings::Replay,
            SimulatorKind::Cuboid => SimulatorSettings::Cuboid {
                half_extents: simulator.half_extents.unwrap_or(defaults.half_extents),
                hand: CuboidHand {
                    fingers: simulator.fingers.unwrap_or(defaults.hand.fingers),
                    phalanges: simulator.phalanges.unwrap_or(defaults.hand.phalanges),
                    reach: simulator.reach.unwrap_or(defaults.hand.reach),
                    phalanx_spacing: simulator
                        .phalanx_spacing
                        .unwrap_or(defaults.hand.phalanx_spacing),
                },
            },
        }
    }

    fn merge_top(&mut self, args: &BatchArgs, defaults: &DefaultsConfig) -> usize {
        let output = self.output.take().unwrap_or_default();
        args.top.or(output.top).unwrap_or(defaults.top)
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value_str) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;

            match key {
                "scoring.weights.sigma-min" => {
                    self.weights().sigma_min = Some(parse_value(key, value_str)?);
                }
                "scoring.weights.wrench-volume" => {
                    self.weights().wrench_volume = Some(parse_value(key, value_str)?);
                }
                "scoring.weights.isotropy" => {
                    self.weights().isotropy = Some(parse_value(key, value_str)?);
                }
                "scoring.degenerate-range" => {
                    self.scoring
                        .get_or_insert_with(Default::default)
                        .degenerate_range = Some(PartialDegenerateRange::parse(value_str));
                }
                "perturbation.samples" => {
                    self.perturbation().samples = Some(parse_value(key, value_str)?);
                }
                "perturbation.sigma-position" => {
                    self.perturbation().sigma_position = Some(parse_value(key, value_str)?);
                }
                "perturbation.sigma-angle" => {
                    self.perturbation().sigma_angle = Some(parse_value(key, value_str)?);
                }
                "perturbation.normalization" => {
                    self.perturbation().normalization = Some(parse_value(key, value_str)?);
                }
                "perturbation.seed" => {
                    self.perturbation().seed = Some(parse_value(key, value_str)?);
                }
                "simulator.type" => {
                    self.simulator().kind = Some(parse_value(key, value_str)?);
                }
                "simulator.fingers" => {
                    self.simulator().fingers = Some(parse_value(key, value_str)?);
                }
                "simulator.phalanges" => {
                    self.simulator().phalanges = Some(parse_value(key, value_str)?);
                }
                "simulator.reach" => {
                    self.simulator().reach = Some(parse_value(key, value_str)?);
                }
                "simulator.phalanx-spacing" => {
                    self.simulator().phalanx_spacing = Some(parse_value(key, value_str)?);
                }
                "output.top" => {
                    self.output.get_or_insert_with(Default::default).top =
                        Some(parse_value(key, value_str)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }

    fn weights(&mut self) -> &mut PartialWeights {
        self.scoring
            .get_or_insert_with(Default::default)
            .weights
            .get_or_insert_with(Default::default)
    }

    fn perturbation(&mut self) -> &mut PartialPerturbationConfig {
        self.perturbation.get_or_insert_with(Default::default)
    }

    fn simulator(&mut self) -> &mut PartialSimulatorConfig {
        self.simulator.get_or_insert_with(Default::default)
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid value for {}: {}", key, value)))
}
