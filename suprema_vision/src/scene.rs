// THEORY:
// `SceneState` is the owner of everything on screen: the authored composition, the
// current generated set and the animation parameters. It is the one place where
// pipeline results meet long-lived state, so it enforces two rules:
//
// 1.  **Wholesale Replacement**: a successful upload replaces the entire generated
//     set. There is no merging with the previous set.
// 2.  **Latest Upload Wins**: uploads are not cancelled when a new one starts, so
//     results may arrive late or out of order. Every upload takes a ticket from
//     `begin_upload`; a result whose ticket is not the newest is discarded as stale.
//
// A failed upload never touches the scene. The error is handed back to the caller,
// who decides how to tell the user.

use crate::core_modules::animation::{AnimationParams, ElementMotion};
use crate::core_modules::authored::authored_elements;
use crate::core_modules::placement::SceneElement;
use crate::error::PipelineError;
use log::{info, warn};

/// Identifies one upload attempt. Later uploads get larger tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UploadTicket(u64);

/// What happened to an upload result handed to `SceneState::apply_upload`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The generated set was replaced with this many elements.
    Applied { generated: usize },
    /// A newer upload was started in the meantime; the result was dropped.
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct SceneState {
    authored: Vec<SceneElement>,
    generated: Vec<SceneElement>,
    animation: AnimationParams,
    last_ticket: u64,
}

impl SceneState {
    /// A scene with the given authored elements and no generated ones.
    pub fn new(authored: Vec<SceneElement>) -> Self {
        Self {
            authored,
            ..Self::default()
        }
    }

    /// A scene holding the built-in authored composition.
    pub fn with_authored_composition() -> Result<Self, PipelineError> {
        Ok(Self::new(authored_elements()?))
    }

    pub fn begin_upload(&mut self) -> UploadTicket {
        self.last_ticket += 1;
        UploadTicket(self.last_ticket)
    }

    pub fn is_current(&self, ticket: UploadTicket) -> bool {
        ticket.0 == self.last_ticket
    }

    /// Applies the result of the upload identified by `ticket`. Errors are returned
    /// unchanged and leave the scene as it was.
    pub fn apply_upload(
        &mut self,
        ticket: UploadTicket,
        result: Result<Vec<SceneElement>, PipelineError>,
    ) -> Result<UploadOutcome, PipelineError> {
        if !self.is_current(ticket) {
            warn!(
                "scene: discarding result of upload {} (latest is {})",
                ticket.0, self.last_ticket
            );
            return Ok(UploadOutcome::Stale);
        }

        let generated = result?;
        info!(
            "scene: replacing {} generated elements with {}",
            self.generated.len(),
            generated.len()
        );
        self.generated = generated;
        Ok(UploadOutcome::Applied {
            generated: self.generated.len(),
        })
    }

    /// Authored elements first, then generated ones. This is the draw order.
    pub fn elements(&self) -> impl Iterator<Item = &SceneElement> {
        self.authored.iter().chain(self.generated.iter())
    }

    pub fn authored(&self) -> &[SceneElement] {
        &self.authored
    }

    pub fn generated(&self) -> &[SceneElement] {
        &self.generated
    }

    pub fn generated_count(&self) -> usize {
        self.generated.len()
    }

    pub fn clear_generated(&mut self) {
        self.generated.clear();
    }

    pub fn animation(&self) -> &AnimationParams {
        &self.animation
    }

    pub fn set_animation(&mut self, params: AnimationParams) -> Result<(), PipelineError> {
        params.validate()?;
        self.animation = params;
        Ok(())
    }

    pub fn reset_animation(&mut self) {
        self.animation.reset();
    }

    /// The pose of every element, in draw order, `time` seconds into the animation.
    pub fn frame(&self, time: f32) -> Vec<ElementMotion> {
        self.elements()
            .enumerate()
            .map(|(index, element)| ElementMotion::evaluate(&self.animation, element, index, time))
            .collect()
    }
}
