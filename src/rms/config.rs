/// How reference and test structures are paired in a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairingMode {
    /// Reference *i* against test *i*, until either stream runs out.
    #[default]
    Paired,
    /// The first reference against every test structure.
    FirstReference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RmsConfig {
    /// Superpose each correspondence before measuring it.
    pub minimize: bool,
    pub pairing: PairingMode,
}
