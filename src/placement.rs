//! Random placement of the real piece and the decoy on one background.
//!
//! The real offset is drawn once from `[piece + 10, bg - piece]`. The decoy
//! offset is drawn from `[decoy, bg - decoy]` and re-drawn until its span lies
//! strictly left or strictly right of the real span, up to a retry ceiling.

use rand::Rng;

use crate::error::{Error, Result};

/// Extra left margin, beyond one piece width, for the real piece.
pub const LEFT_MARGIN: u32 = 10;

/// Default ceiling on decoy samples before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;

/// Horizontal offsets chosen for one challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Left edge of the real piece.
    pub real_x: u32,
    /// Left edge of the decoy piece.
    pub decoy_x: u32,
}

impl Placement {
    /// Whether the decoy span is separated from the real span by a gap.
    #[must_use]
    pub fn is_separated(&self, piece_width: u32, decoy_width: u32) -> bool {
        let (real, decoy) = (u64::from(self.real_x), u64::from(self.decoy_x));
        (decoy > real && real + u64::from(piece_width) < decoy)
            || u64::from(decoy_width) + decoy < real
    }
}

/// Rejection sampler for piece offsets.
#[derive(Debug, Clone, Copy)]
pub struct PlacementPlanner {
    max_attempts: u32,
}

impl Default for PlacementPlanner {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl PlacementPlanner {
    /// Create a planner that draws at most `max_attempts` decoy samples.
    #[must_use]
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    /// The configured retry ceiling.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Choose offsets for a `piece_width` real piece and a `decoy_width` decoy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PlacementInfeasible`] when either sampling range is
    /// empty or no separated decoy offset is found within the retry ceiling.
    pub fn plan<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        background_width: u32,
        piece_width: u32,
        decoy_width: u32,
    ) -> Result<Placement> {
        let infeasible = |attempts| Error::PlacementInfeasible {
            background_width,
            piece_width,
            decoy_width,
            attempts,
        };

        let real_lo = piece_width.saturating_add(LEFT_MARGIN);
        let real_hi = background_width
            .checked_sub(piece_width)
            .ok_or_else(|| infeasible(0))?;
        if real_lo > real_hi {
            return Err(infeasible(0));
        }

        let decoy_lo = decoy_width;
        let decoy_hi = background_width
            .checked_sub(decoy_width)
            .ok_or_else(|| infeasible(0))?;
        if decoy_lo > decoy_hi {
            return Err(infeasible(0));
        }

        let real_x = rng.random_range(real_lo..=real_hi);
        for attempt in 1..=self.max_attempts {
            let decoy_x = rng.random_range(decoy_lo..=decoy_hi);
            let placement = Placement { real_x, decoy_x };
            if placement.is_separated(piece_width, decoy_width) {
                log::debug!(
                    "placed real piece at {real_x}, decoy at {decoy_x} (attempt {attempt})"
                );
                return Ok(placement);
            }
            log::trace!("rejected decoy offset {decoy_x} against real offset {real_x}");
        }

        Err(infeasible(self.max_attempts))
    }
}
