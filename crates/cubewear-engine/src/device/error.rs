/// What the frame loop does after a failed frame acquisition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface lost or outdated and reconfigured; draw again next frame.
    Reconfigured,
    /// Transient (timeout); skip this frame.
    SkipFrame,
    /// Out of memory; shut the face down.
    Fatal,
}
