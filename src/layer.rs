use crate::composite::{self, Composite, CompositeState, Container};
use crate::context::{BasicContext, Context};
use crate::element::{Element, ElementPtr};
use crate::limits::{ViewLimits, FULL_EXTENT};
use crate::rect::{Extent, Rect};
use core::fmt;
use tracing::debug;

/// Overlays its children on top of each other.
///
/// Every child receives the full bounds of the layer. The last child is the front-most one, so
/// hit testing goes back to front.
pub struct Layer {
    elements: Container,
    state: CompositeState,
}

impl Layer {
    pub fn new(elements: Vec<ElementPtr>) -> Layer {
        Layer {
            elements: Container::new(elements),
            state: CompositeState::new(),
        }
    }

    /// A copy of the layers, back to front.
    pub fn layers(&self) -> Vec<ElementPtr> {
        self.elements.elements()
    }

    /// Adds `e` in front of all other layers.
    pub fn push(&self, e: ElementPtr) {
        self.elements.push(e);
        debug!(count = self.elements.len(), "layer added");
    }

    /// Removes `e`. Returns false if it is not one of the layers.
    pub fn remove(&self, e: &dyn Element) -> bool {
        let ix = match self.elements.position(e) {
            Some(ix) => ix,
            None => return false,
        };
        self.elements.remove(e);
        self.state.remap(|i| match i {
            i if i < ix => Some(i),
            i if i == ix => None,
            i => Some(i - 1),
        });
        debug!(count = self.elements.len(), "layer removed");
        true
    }

    /// Brings `e` in front of all other layers. Returns false if it is not one of the layers.
    pub fn move_to_front(&self, e: &dyn Element) -> bool {
        let ix = match self.elements.position(e) {
            Some(ix) => ix,
            None => return false,
        };
        let last = self.elements.len() - 1;
        self.elements.move_to_back(e);
        self.state.remap(|i| match i {
            i if i < ix => Some(i),
            i if i == ix => Some(last),
            i => Some(i - 1),
        });
        debug!(index = ix, "layer moved to front");
        true
    }

    /// True if `e` is the front-most layer.
    pub fn is_front(&self, e: &dyn Element) -> bool {
        let len = self.elements.len();
        len > 0 && self.elements.position(e) == Some(len - 1)
    }
}

impl Default for Layer {
    fn default() -> Self {
        Layer::new(Vec::new())
    }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Layer")
            .field("elements", &self.elements)
            .field("state", &self.state)
            .finish()
    }
}

impl Composite for Layer {
    fn len(&self) -> usize {
        self.elements.len()
    }

    fn at(&self, ix: usize) -> Option<ElementPtr> {
        self.elements.at(ix)
    }

    fn bounds_of(&self, ctx: &Context, _: usize) -> Rect {
        ctx.bounds
    }

    fn reverse_index(&self) -> bool {
        true
    }

    fn composite_state(&self) -> &CompositeState {
        &self.state
    }
}

impl_composite! {
    Layer;

    fn limits(&self, ctx: &BasicContext) -> ViewLimits {
        let mut min = Extent::new(0., 0.);
        let mut max = Extent::new(FULL_EXTENT, FULL_EXTENT);
        for e in self.elements.elements() {
            let l = e.limits(ctx);
            min.x = min.x.max(l.min.x);
            min.y = min.y.max(l.min.y);
            max.x = max.x.min(l.max.x);
            max.y = max.y.min(l.max.y);
        }
        max.x = max.x.max(min.x);
        max.y = max.y.max(min.y);
        ViewLimits::new(min, max)
    }

    fn draw(&self, ctx: &Context) {
        composite::draw(self, ctx)
    }

    fn layout(&self, ctx: &Context) {
        composite::layout(self, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::NullCanvas;
    use crate::composite::hit_element;
    use crate::element::BoxElement;
    use crate::rect::Point;
    use crate::testing::{test_view, Probe};
    use std::sync::Arc;

    #[test]
    fn front_layer_is_hit_first() {
        let back: ElementPtr = Arc::new(Probe::control());
        let front: ElementPtr = Arc::new(Probe::control());
        let layer = Layer::new(vec![back.clone(), front.clone()]);

        let (view, _) = test_view();
        let canvas = NullCanvas::new(view.bounds());
        let ctx = Context::new(&view, &canvas, &layer, Rect::new(0., 0., 100., 100.));

        let info = hit_element(&layer, &ctx, Point::new(50., 50.), true).expect("both layers cover the point");
        assert_eq!(info.index, 1, "the last layer is in front");

        assert!(layer.move_to_front(&*back));
        assert!(layer.is_front(&*back));
        let info = hit_element(&layer, &ctx, Point::new(50., 50.), true).unwrap();
        assert!(crate::element::same_element(&*info.element, &*back));

        let stranger = BoxElement::new(Default::default());
        assert!(!layer.remove(&stranger), "removing a foreign element does nothing");
        crate::composite::set_focus(&layer, 1);
        assert!(layer.remove(&*front));
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.focus_index(), Some(0), "focus follows the layer behind the removed one");
    }
}
