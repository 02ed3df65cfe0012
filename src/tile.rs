//! Stacking composites.

use crate::composite::{self, Composite, CompositeState, Container};
use crate::context::{BasicContext, Context};
use crate::element::ElementPtr;
use crate::limits::{ViewLimits, FULL_EXTENT};
use crate::list::Axis;
use crate::rect::Rect;
use core::fmt;

/// Stacks its children along one axis.
///
/// Every child gets its minimum size along the axis; leftover space is shared out in
/// proportion to how much each child can still grow.
pub struct Tile {
    axis: Axis,
    elements: Container,
    state: CompositeState,
}

impl Tile {
    pub fn new(axis: Axis, elements: Vec<ElementPtr>) -> Tile {
        Tile {
            axis,
            elements: Container::new(elements),
            state: CompositeState::new(),
        }
    }

    /// Stacks children top to bottom.
    pub fn vertical(elements: Vec<ElementPtr>) -> Tile {
        Tile::new(Axis::Vertical, elements)
    }

    /// Stacks children left to right.
    pub fn horizontal(elements: Vec<ElementPtr>) -> Tile {
        Tile::new(Axis::Horizontal, elements)
    }

    pub fn push(&self, e: ElementPtr) {
        self.elements.push(e);
    }

    /// Main-axis offset and size of each child.
    fn spans(&self, ctx: &Context) -> Vec<(f64, f64)> {
        let basic = ctx.basic();
        let limits: Vec<ViewLimits> = self
            .elements
            .elements()
            .iter()
            .map(|e| e.limits(&basic))
            .collect();

        let (start, end) = self.axis.main_range(ctx.bounds);
        let mins: f64 = limits.iter().map(|l| self.axis.main(l.min)).sum();
        let capacity: f64 = limits
            .iter()
            .map(|l| self.axis.main(l.max) - self.axis.main(l.min))
            .sum();
        let extra = (end - start - mins).max(0.);

        let mut pos = start;
        limits
            .iter()
            .map(|l| {
                let min = self.axis.main(l.min);
                let room = self.axis.main(l.max) - min;
                let size = if capacity > 0. {
                    min + extra.min(capacity) * room / capacity
                } else {
                    min
                };
                let span = (pos, size);
                pos += size;
                span
            })
            .collect()
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Tile")
            .field("axis", &self.axis)
            .field("elements", &self.elements)
            .finish()
    }
}

impl Composite for Tile {
    fn len(&self) -> usize {
        self.elements.len()
    }

    fn at(&self, ix: usize) -> Option<ElementPtr> {
        self.elements.at(ix)
    }

    fn bounds_of(&self, ctx: &Context, ix: usize) -> Rect {
        match self.spans(ctx).get(ix) {
            Some(&(pos, size)) => self.axis.with_main(ctx.bounds, pos, size),
            None => {
                let (_, end) = self.axis.main_range(ctx.bounds);
                self.axis.with_main(ctx.bounds, end, 0.)
            }
        }
    }

    fn composite_state(&self) -> &CompositeState {
        &self.state
    }
}

impl_composite! {
    Tile;

    fn limits(&self, ctx: &BasicContext) -> ViewLimits {
        let mut main_min = 0.;
        let mut main_max = 0.;
        let mut cross_min: f64 = 0.;
        let mut cross_max: f64 = FULL_EXTENT;
        for e in self.elements.elements() {
            let l = e.limits(ctx);
            main_min += self.axis.main(l.min);
            main_max += self.axis.main(l.max);
            cross_min = cross_min.max(self.axis.cross(l.min));
            cross_max = cross_max.min(self.axis.cross(l.max));
        }
        let main_max = f64::min(main_max, FULL_EXTENT);
        let cross_max = cross_max.max(cross_min);
        ViewLimits::new(
            self.axis.extent(main_min, cross_min),
            self.axis.extent(main_max, cross_max),
        )
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
    use crate::element::BoxElement;
    use crate::limits::ViewLimits;
    use crate::rect::Extent;
    use crate::testing::test_view;
    use std::sync::Arc;

    #[test]
    fn tile_shares_extra_space() {
        let fixed: ElementPtr = Arc::new(BoxElement::fixed(Default::default(), Extent::new(50., 20.)));
        let stretchy: ElementPtr = Arc::new(BoxElement::new(Default::default()).with_limits(
            ViewLimits::new(Extent::new(0., 10.), Extent::new(FULL_EXTENT, FULL_EXTENT)),
        ));
        let tile = Tile::vertical(vec![fixed, stretchy]);

        let (view, _) = test_view();
        let canvas = NullCanvas::new(view.bounds());
        let ctx = Context::new(&view, &canvas, &tile, Rect::new(0., 0., 100., 100.));

        assert_eq!(tile.bounds_of(&ctx, 0), Rect::new(0., 0., 100., 20.));
        assert_eq!(
            tile.bounds_of(&ctx, 1),
            Rect::new(0., 20., 100., 100.),
            "the stretchy child takes the rest"
        );

        let limits = crate::Element::limits(&tile, &ctx.basic());
        assert_eq!(limits.min, Extent::new(50., 30.));
    }
}
