//! Searching the element tree and the context chain.
//!
//! Proxies are unwrapped one layer at a time through [`Element::subject`], and typed lookups go
//! through [`Element::as_any`].

use crate::composite::Composite;
use crate::context::Context;
use crate::element::{same_element, Element, Selectable};
use core::any::Any;

/// Finds the outermost subject of type `T` below the proxy `e`.
///
/// Only subjects are searched, not `e` itself.
pub fn find_subject<T: Any>(e: &dyn Element) -> Option<&T> {
    let mut next = e.subject();
    while let Some(subject) = next {
        if let Some(found) = subject.as_any().downcast_ref::<T>() {
            return Some(found);
        }
        next = subject.subject();
    }
    None
}

/// Like [`find_subject`], but also checks `e` itself first.
pub fn find_element<T: Any>(e: &dyn Element) -> Option<&T> {
    match e.as_any().downcast_ref::<T>() {
        Some(found) => Some(found),
        None => find_subject(e),
    }
}

/// Finds the outermost composite in `e` or its subjects.
pub fn find_composite_in(e: &dyn Element) -> Option<&dyn Composite> {
    let mut next = Some(e);
    while let Some(e) = next {
        if let Some(c) = e.as_composite() {
            return Some(c);
        }
        next = e.subject().map(|s| &**s);
    }
    None
}

/// Finds the outermost selectable item in `e` or its subjects.
pub fn find_selectable(e: &dyn Element) -> Option<&dyn Selectable> {
    let mut next = Some(e);
    while let Some(e) = next {
        if let Some(s) = e.as_selectable() {
            return Some(s);
        }
        next = e.subject().map(|s| &**s);
    }
    None
}

/// Finds the outermost composite in the element of `ctx` or its subjects, and calls `f` with it
/// and its context.
///
/// Returns false if there is no such composite.
pub fn with_composite(ctx: &Context, f: &mut dyn FnMut(&dyn Composite, &Context)) -> bool {
    let mut next = Some(ctx.element);
    while let Some(e) = next {
        if let Some(c) = e.as_composite() {
            return ctx.element.in_context_do(ctx, e, &mut |cctx| f(c, cctx));
        }
        next = e.subject().map(|s| &**s);
    }
    false
}

/// Finds the innermost composite enclosing the element of `ctx`, together with its context.
pub fn find_composite<'c>(ctx: &'c Context<'_>) -> Option<(&'c dyn Composite, &'c Context<'c>)> {
    let this = ctx.element;
    for p in ctx.ancestors() {
        let mut next = Some(p.element);
        while let Some(e) = next {
            if let Some(c) = e.as_composite() {
                if !same_element(e, this) {
                    return Some((c, p));
                }
            }
            next = e.subject().map(|s| &**s);
        }
    }
    None
}

/// Finds the innermost ancestor of type `T`.
pub fn find_parent<'c, T: Any>(ctx: &'c Context<'_>) -> Option<&'c T> {
    find_parent_context::<T>(ctx).and_then(|p| p.element.as_any().downcast_ref::<T>())
}

/// Finds the context of the innermost ancestor of type `T`.
pub fn find_parent_context<'c, T: Any>(ctx: &'c Context<'_>) -> Option<&'c Context<'c>> {
    ctx.ancestors()
        .find(|p| p.element.as_any().downcast_ref::<T>().is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::NullCanvas;
    use crate::element::{BoxElement, ElementPtr};
    use crate::proxy::Margin;
    use crate::rect::Rect;
    use crate::testing::test_view;
    use crate::tile::Tile;
    use std::sync::Arc;

    #[test]
    fn finds_through_proxies_and_contexts() {
        let boxed: ElementPtr = Arc::new(BoxElement::new(Default::default()));
        let tile: ElementPtr = Arc::new(Tile::vertical(vec![boxed.clone()]));
        let margin = Margin::uniform(2., tile.clone());

        assert!(find_subject::<Tile>(&margin).is_some(), "tile is the margin's subject");
        assert!(find_subject::<Margin>(&margin).is_none(), "find_subject skips the element itself");
        assert!(find_element::<Margin>(&margin).is_some());
        assert!(find_composite_in(&margin).is_some());

        let (view, _) = test_view();
        let canvas = NullCanvas::new(view.bounds());
        let root = Context::new(&view, &canvas, &margin, Rect::new(0., 0., 100., 100.));
        let tctx = root.sub(&*tile, Rect::new(2., 2., 98., 98.));
        let bctx = tctx.sub(&*boxed, Rect::new(2., 2., 98., 20.));

        assert!(find_parent::<Margin>(&bctx).is_some());
        assert!(find_parent::<BoxElement>(&bctx).is_none(), "the element itself is not a parent");
        let (_, cctx) = find_composite(&bctx).expect("tile encloses the box");
        assert_eq!(cctx.bounds, tctx.bounds);
        assert!(
            find_composite(&tctx).is_none(),
            "a composite is not its own enclosing composite"
        );
    }
}
