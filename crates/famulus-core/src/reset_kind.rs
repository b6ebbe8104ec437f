/// How the console is being reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResetKind {
    /// Power cycle: RAM, OAM, palette and nametables are cleared.
    PowerOn,
    /// Reset button: memories survive, CPU and PPU registers restart.
    Soft,
}
