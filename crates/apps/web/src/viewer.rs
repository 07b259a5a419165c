use catalog::Resolution;
use layers::{MapAssembler, MapError, RenderablePayload};
use tracing::{debug, warn};

use crate::map_controller::ViewportController;

/// Identity of a payload request. A newer key supersedes an older one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestKey {
    pub tier: Resolution,
    pub selected: Option<String>,
}

/// What a render surface holds: the current payload and its pan state.
#[derive(Debug)]
pub struct Viewer {
    assembler: MapAssembler,
    current: Option<(RequestKey, RenderablePayload)>,
    controller: ViewportController,
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(MapAssembler::builtin())
    }
}

impl Viewer {
    pub fn new(assembler: MapAssembler) -> Self {
        Self {
            assembler,
            current: None,
            controller: ViewportController::new(Default::default()),
        }
    }

    /// Shows the map for `tier` and `selected`.
    ///
    /// A request equal to the current one is not rebuilt. Any other request
    /// that succeeds resets the pan; the result tells whether the markup
    /// differs from what was shown before. On error the previous payload
    /// stays on screen.
    pub fn request(&mut self, tier: &str, selected: Option<&str>) -> Result<bool, MapError> {
        let key = RequestKey {
            tier: tier.parse()?,
            selected: selected.map(str::to_string),
        };
        if self.current.as_ref().is_some_and(|(k, _)| *k == key) {
            return Ok(false);
        }

        let payload = match self.assembler.build_payload(key.tier, selected) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(%err, tier = %key.tier, "keeping previous map");
                return Err(err);
            }
        };

        let changed = self
            .current
            .as_ref()
            .is_none_or(|(_, p)| p.content_hash() != payload.content_hash());
        self.controller.reset(&payload);
        debug!(changed, tier = %key.tier, "map request applied");
        self.current = Some((key, payload));
        Ok(changed)
    }

    pub fn payload(&self) -> Option<&RenderablePayload> {
        self.current.as_ref().map(|(_, p)| p)
    }

    pub fn controller(&self) -> &ViewportController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ViewportController {
        &mut self.controller
    }
}
