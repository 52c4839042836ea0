use grasprank::core::simulator::cuboid::CuboidHand;

/// Built-in values for settings that neither the config file nor the command line provide.
pub struct DefaultsConfig {
    pub top: usize,
    pub half_extents: [f64; 3],
    pub hand: CuboidHand,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            top: 10,
            half_extents: [0.05, 0.05, 0.05],
            hand: CuboidHand::default(),
        }
    }
}
