//=========================================================================
// Input Router
//=========================================================================
//
// Fans platform input out to the listeners scenes attach.
//
// Architecture:
//   InputRouter
//     ├─ mapping: DisplayMapping (display px → surface px)
//     └─ routes:  [Route { kinds, Sender }]
//                          │ crossbeam channel (unbounded)
//   Listener  ←────────────┘ Receiver, drained by the scene in update()
//
// Each `attach` creates one route and returns the matching `Listener`;
// `detach` consumes the listener and removes its route. The number of
// live routes is what the host compares before and after a scene's
// lifetime to detect leaks.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{EventKind, InputEvent};

//=== DisplayMapping ======================================================

/// Affine map from display (window) coordinates to surface coordinates.
///
/// Needed whenever the surface is shown scaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMapping {
    pub scale_x: f32,
    pub scale_y: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl DisplayMapping {
    pub const IDENTITY: DisplayMapping = DisplayMapping {
        scale_x: 1.0,
        scale_y: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
    };

    /// Mapping for a surface stretched to fill a display of the given size.
    pub fn stretched(display: (f32, f32), surface: (u32, u32)) -> Self {
        if display.0 <= 0.0 || display.1 <= 0.0 {
            return Self::IDENTITY;
        }
        Self {
            scale_x: surface.0 as f32 / display.0,
            scale_y: surface.1 as f32 / display.1,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    pub fn to_surface(&self, x: f32, y: f32) -> (f32, f32) {
        (
            (x - self.offset_x) * self.scale_x,
            (y - self.offset_y) * self.scale_y,
        )
    }
}

impl Default for DisplayMapping {
    fn default() -> Self {
        Self::IDENTITY
    }
}

//=== Listener ============================================================

/// Identity of one attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Receiving end of an attachment. Must be handed back to
/// [`InputRouter::detach`] when the owning scene cleans up.
#[derive(Debug)]
pub struct Listener {
    id: ListenerId,
    receiver: Receiver<InputEvent>,
}

impl Listener {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Takes every event received so far, oldest first.
    pub fn drain(&self) -> impl Iterator<Item = InputEvent> + '_ {
        self.receiver.try_iter()
    }
}

//=== InputRouter =========================================================

struct Route {
    id: ListenerId,
    kinds: Vec<EventKind>,
    sender: Sender<InputEvent>,
}

/// Shared input-routing service scenes compose with.
pub struct InputRouter {
    routes: Vec<Route>,
    next_id: u64,
    mapping: DisplayMapping,
}

impl InputRouter {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            next_id: 0,
            mapping: DisplayMapping::IDENTITY,
        }
    }

    //--- Attachment -------------------------------------------------------

    /// Subscribes to every event whose kind is in `kinds`.
    pub fn attach(&mut self, kinds: &[EventKind]) -> Listener {
        let id = ListenerId(self.next_id);
        self.next_id += 1;

        let (sender, receiver) = unbounded();
        self.routes.push(Route {
            id,
            kinds: kinds.to_vec(),
            sender,
        });

        debug!(target: "platform::input", "Attached listener {:?} for {:?}", id, kinds);
        Listener { id, receiver }
    }

    /// Removes the route belonging to `listener`.
    ///
    /// Returns `false` if the route was already gone (pruned or detached).
    pub fn detach(&mut self, listener: Listener) -> bool {
        let before = self.routes.len();
        self.routes.retain(|route| route.id != listener.id);

        let removed = self.routes.len() < before;
        if removed {
            debug!(target: "platform::input", "Detached listener {:?}", listener.id);
        }
        removed
    }

    /// Drops every route attached after the first `count`. Returns how
    /// many were dropped.
    pub fn release_since(&mut self, count: usize) -> usize {
        let surplus = self.routes.len().saturating_sub(count);
        for route in self.routes.drain(count.min(self.routes.len())..) {
            debug!(target: "platform::input", "Released listener {:?}", route.id);
        }
        surplus
    }

    /// Number of live attachments.
    pub fn listener_count(&self) -> usize {
        self.routes.len()
    }

    //--- Dispatch ---------------------------------------------------------

    pub fn set_display_mapping(&mut self, mapping: DisplayMapping) {
        self.mapping = mapping;
    }

    pub fn display_mapping(&self) -> DisplayMapping {
        self.mapping
    }

    /// Converts `event` to surface coordinates and delivers it.
    pub fn dispatch(&mut self, event: InputEvent) {
        let mapping = self.mapping;
        let event = event.map_position(|x, y| mapping.to_surface(x, y));
        let kind = event.kind();

        self.routes.retain(|route| {
            if !route.kinds.contains(&kind) {
                return true;
            }
            if route.sender.send(event).is_ok() {
                return true;
            }
            warn!(
                target: "platform::input",
                "Listener {:?} was dropped without detaching; pruning",
                route.id
            );
            false
        });
    }
}

impl Default for InputRouter {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::KeyCode;

    fn tap(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerUp { x, y }
    }

    #[test]
    fn listener_receives_only_subscribed_kinds() {
        let mut router = InputRouter::new();
        let listener = router.attach(&[EventKind::KeyDown]);

        router.dispatch(tap(1.0, 1.0));
        router.dispatch(InputEvent::KeyDown(KeyCode::Space));

        let got: Vec<_> = listener.drain().collect();
        assert_eq!(got, vec![InputEvent::KeyDown(KeyCode::Space)]);
    }

    #[test]
    fn release_since_keeps_earlier_routes() {
        let mut router = InputRouter::new();
        let kept = router.attach(&[EventKind::PointerUp]);
        let _late = router.attach(&[EventKind::PointerUp]);
        let _later = router.attach(&[EventKind::KeyDown]);

        assert_eq!(router.release_since(1), 2);
        assert_eq!(router.listener_count(), 1);
        assert_eq!(router.release_since(5), 0);

        router.dispatch(tap(3.0, 4.0));
        assert_eq!(kept.drain().count(), 1);
    }

    #[test]
    fn order_is_preserved_across_kinds() {
        let mut router = InputRouter::new();
        let listener = router.attach(&EventKind::DRAG);

        router.dispatch(InputEvent::TouchStart { x: 0.0, y: 0.0 });
        router.dispatch(InputEvent::TouchMove { x: 1.0, y: 0.0 });
        router.dispatch(InputEvent::TouchEnd { x: 2.0, y: 0.0 });

        let kinds: Vec<_> = listener.drain().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![EventKind::TouchStart, EventKind::TouchMove, EventKind::TouchEnd]
        );
    }

    #[test]
    fn attach_and_detach_balance() {
        let mut router = InputRouter::new();
        let a = router.attach(&[EventKind::PointerUp]);
        let b = router.attach(&[EventKind::KeyDown]);
        assert_eq!(router.listener_count(), 2);

        assert!(router.detach(a));
        assert!(router.detach(b));
        assert_eq!(router.listener_count(), 0);
    }

    #[test]
    fn detached_listener_gets_nothing_more() {
        let mut router = InputRouter::new();
        let keep = router.attach(&[EventKind::PointerUp]);
        let gone = router.attach(&[EventKind::PointerUp]);
        let gone_id = gone.id();
        router.detach(gone);

        router.dispatch(tap(5.0, 5.0));

        assert_eq!(keep.drain().count(), 1);
        assert!(router.routes.iter().all(|r| r.id != gone_id));
    }

    #[test]
    fn dropped_listener_is_pruned_on_dispatch() {
        let mut router = InputRouter::new();
        drop(router.attach(&[EventKind::PointerUp]));
        assert_eq!(router.listener_count(), 1);

        router.dispatch(tap(0.0, 0.0));
        assert_eq!(router.listener_count(), 0);
    }

    #[test]
    fn positions_are_scaled_to_surface() {
        let mut router = InputRouter::new();
        router.set_display_mapping(DisplayMapping::stretched((800.0, 600.0), (400, 300)));
        let listener = router.attach(&[EventKind::PointerUp]);

        router.dispatch(tap(200.0, 100.0));

        assert_eq!(listener.drain().next(), Some(tap(100.0, 50.0)));
    }

    #[test]
    fn degenerate_display_maps_identity() {
        assert_eq!(
            DisplayMapping::stretched((0.0, 600.0), (400, 300)),
            DisplayMapping::IDENTITY
        );
    }
}
