//! Per-upload progress state machine.

use serde::Serialize;

use dropzone_core::types::UploadId;

use super::draft::FileDraft;

/// Progress value at which an upload is complete.
pub const COMPLETE: f64 = 100.0;

/// Lifecycle of a simulated upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadPhase {
    /// Accepted, no tick yet.
    Pending,
    /// Ticking towards 100.
    InProgress,
    /// Reached 100 and was stored.
    Completed,
    /// Reached 100 but could not be stored.
    Failed,
    /// Removed from the visible list.
    Cleared,
}

impl UploadPhase {
    /// Whether further ticks can move the progress.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }
}

/// One tracked upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadEntry {
    /// Upload identifier.
    pub id: UploadId,
    /// File being uploaded.
    pub draft: FileDraft,
    /// Progress in percent, `0.0..=100.0`.
    pub progress: f64,
    /// Current phase.
    pub phase: UploadPhase,
    /// Start order, used to list uploads stably.
    #[serde(skip)]
    pub(crate) seq: u64,
}

impl UploadEntry {
    /// A new pending upload.
    pub fn new(id: UploadId, draft: FileDraft, seq: u64) -> Self {
        Self {
            id,
            draft,
            progress: 0.0,
            phase: UploadPhase::Pending,
            seq,
        }
    }

    /// Apply one tick. Negative or non-finite increments count as zero;
    /// progress clamps at 100, where the phase becomes `Completed`.
    /// Ticks after the upload left the active phases change nothing.
    pub fn advance(&mut self, increment: f64) -> UploadPhase {
        if !self.phase.is_active() {
            return self.phase;
        }
        let step = if increment.is_finite() {
            increment.max(0.0)
        } else {
            0.0
        };
        self.progress = (self.progress + step).min(COMPLETE);
        self.phase = if self.progress >= COMPLETE {
            UploadPhase::Completed
        } else {
            UploadPhase::InProgress
        };
        self.phase
    }

    /// Mark a finished upload as not stored.
    pub fn fail(&mut self) {
        self.phase = UploadPhase::Failed;
    }

    /// Whole-number percentage for display.
    pub fn percent(&self) -> u8 {
        self.progress.floor().clamp(0.0, COMPLETE) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> UploadEntry {
        UploadEntry::new(UploadId::new(), FileDraft::new("a.txt", 10, "text/plain"), 0)
    }

    #[test]
    fn test_advance_moves_through_phases() {
        let mut e = entry();
        assert_eq!(e.phase, UploadPhase::Pending);
        assert_eq!(e.advance(0.0), UploadPhase::InProgress);
        assert_eq!(e.advance(60.0), UploadPhase::InProgress);
        assert_eq!(e.percent(), 60);
        assert_eq!(e.advance(55.5), UploadPhase::Completed);
        assert_eq!(e.progress, COMPLETE);
    }

    #[test]
    fn test_completed_is_terminal() {
        let mut e = entry();
        e.advance(150.0);
        assert_eq!(e.phase, UploadPhase::Completed);
        assert_eq!(e.advance(10.0), UploadPhase::Completed);
        assert_eq!(e.progress, COMPLETE);
    }

    #[test]
    fn test_bad_increments_do_not_regress() {
        let mut e = entry();
        e.advance(30.0);
        e.advance(-10.0);
        e.advance(f64::NAN);
        assert_eq!(e.progress, 30.0);
        assert_eq!(e.phase, UploadPhase::InProgress);
    }

    #[test]
    fn test_failed_is_terminal() {
        let mut e = entry();
        e.advance(100.0);
        e.fail();
        assert_eq!(e.advance(5.0), UploadPhase::Failed);
    }
}
