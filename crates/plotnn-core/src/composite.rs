//! Expansion of composite blocks into primitive elements.
//!
//! Every stage hangs off the east anchor of its `bottom` block and names its
//! inner layers after the stage name, so later elements (usually skips) can
//! refer to them: `ccr_<name>`, `unpool_<name>`, `ccr_res_<name>`, ...

use log::trace;

use crate::{
    element::{Connection, Conv, ConvConvRelu, ConvRes, Element, Pool, Skip, StageParams, UnPool},
    geometry::{Placement, Point3},
};

/// Encoder stage: `ccr_<name>` (double conv) then the `top` pool.
pub(crate) fn expand_two_conv_pool(params: &StageParams) -> Vec<Element> {
    let (height, depth, width) = params.size;
    let ccr = format!("ccr_{}", params.name);
    // Pools shrink both faces by a quarter of the height.
    let shrink = (height / 4.0).trunc();

    let elements: Vec<Element> = vec![
        ConvConvRelu::new(&ccr)
            .with_spatial(params.spatial)
            .with_filters(params.filters, params.filters)
            .with_offset(params.offset)
            .with_to(Placement::after(&params.bottom))
            .with_size((width, width), height, depth)
            .into(),
        Pool::new(&params.top)
            .with_offset(Point3::ORIGIN)
            .with_to(Placement::after(&ccr))
            .with_size(1.0, height - shrink, depth - shrink)
            .with_opacity(params.opacity)
            .into(),
        Connection::new(&params.bottom, &ccr).into(),
    ];

    trace!(stage = params.name, count = elements.len(); "Expanded encoder stage");
    elements
}

/// Decoder stage: unpool, then residual/plain convolutions ending in `top`.
pub(crate) fn expand_unconv(params: &StageParams) -> Vec<Element> {
    let (height, depth, width) = params.size;
    let unpool = format!("unpool_{}", params.name);
    let res = format!("ccr_res_{}", params.name);
    let ccr = format!("ccr_{}", params.name);
    let res_c = format!("ccr_res_c_{}", params.name);

    let conv_res = |name: &str, after: &str| -> Element {
        ConvRes::new(name)
            .with_to(Placement::after(after))
            .with_spatial(params.spatial)
            .with_filters(params.filters)
            .with_size(width, height, depth)
            .with_opacity(params.opacity)
            .into()
    };
    let conv = |name: &str, after: &str| -> Element {
        Conv::new(name)
            .with_to(Placement::after(after))
            .with_spatial(params.spatial)
            .with_filters(params.filters)
            .with_size(width, height, depth)
            .into()
    };

    let elements: Vec<Element> = vec![
        UnPool::new(&unpool)
            .with_offset(params.offset)
            .with_to(Placement::after(&params.bottom))
            .with_size(1.0, height, depth)
            .with_opacity(params.opacity)
            .into(),
        conv_res(&res, &unpool),
        conv(&ccr, &res),
        conv_res(&res_c, &ccr),
        conv(&params.top, &res_c),
        Connection::new(&params.bottom, &unpool).into(),
    ];

    trace!(stage = params.name, count = elements.len(); "Expanded decoder stage");
    elements
}

/// Residual chain: `num` convolutions, each connected to its predecessor,
/// with a skip from the second layer to the second-to-last.
pub(crate) fn expand_res(num: usize, params: &StageParams) -> Vec<Element> {
    let (height, depth, width) = params.size;

    let mut names: Vec<String> = (0..num.saturating_sub(1))
        .map(|i| format!("{}_{i}", params.name))
        .collect();
    if num > 0 {
        names.push(params.top.clone());
    }

    let mut elements = Vec::with_capacity(names.len() * 2 + 1);
    let mut previous = params.bottom.as_str();
    for name in &names {
        elements.push(
            Conv::new(name)
                .with_offset(params.offset)
                .with_to(Placement::after(previous))
                .with_spatial(params.spatial)
                .with_filters(params.filters)
                .with_size(width, height, depth)
                .into(),
        );
        elements.push(Connection::new(previous, name).into());
        previous = name.as_str();
    }

    if names.len() >= 2 {
        elements.push(Skip::new(&names[1], &names[names.len() - 2]).into());
    }

    trace!(stage = params.name, count = elements.len(); "Expanded residual chain");
    elements
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::element::{ResBlock, TwoConvPoolBlock, UnconvBlock};

    fn names(elements: &[Element]) -> Vec<String> {
        elements
            .iter()
            .map(|e| match e {
                Element::Connection(c) => format!("{}->{}", c.of, c.to),
                Element::Skip(s) => format!("{}~>{}", s.of, s.to),
                other => other.name().unwrap_or_default().to_string(),
            })
            .collect()
    }

    #[test]
    fn test_two_conv_pool_expansion() {
        let block = TwoConvPoolBlock::new("down1", "in", "p1")
            .with_filters(64)
            .with_size((32.0, 28.0, 4.0));
        let elements = Element::from(block).expand();

        assert_eq!(names(&elements), ["ccr_down1", "p1", "in->ccr_down1"]);

        let Element::ConvConvRelu(ccr) = &elements[0] else {
            panic!("expected ConvConvRelu, got {:?}", elements[0]);
        };
        assert_eq!(ccr.filters, (64, 64));
        assert_eq!(ccr.to, Placement::after("in"));
        assert_eq!(ccr.offset, Point3::new(1.0, 0.0, 0.0));

        let Element::Pool(pool) = &elements[1] else {
            panic!("expected Pool, got {:?}", elements[1]);
        };
        assert_eq!(pool.to, Placement::after("ccr_down1"));
        assert_approx_eq!(f32, pool.height, 24.0);
        // Depth shrinks by a quarter of the height, not of the depth.
        assert_approx_eq!(f32, pool.depth, 20.0);
    }

    #[test]
    fn test_two_conv_pool_truncates_shrink() {
        let block = TwoConvPoolBlock::new("d", "in", "p");
        let block = block.with_size((30.0, 30.0, 3.5));
        let elements = Element::from(block).expand();
        let Element::Pool(pool) = &elements[1] else {
            panic!("expected Pool");
        };
        assert_approx_eq!(f32, pool.height, 23.0);
    }

    #[test]
    fn test_unconv_expansion_chain() {
        let elements = Element::from(UnconvBlock::new("up1", "u2", "u1")).expand();

        assert_eq!(
            names(&elements),
            [
                "unpool_up1",
                "ccr_res_up1",
                "ccr_up1",
                "ccr_res_c_up1",
                "u1",
                "u2->unpool_up1"
            ]
        );

        let Element::Conv(top) = &elements[4] else {
            panic!("expected Conv");
        };
        assert_eq!(top.to, Placement::after("ccr_res_c_up1"));
    }

    #[test]
    fn test_res_expansion() {
        let elements = Element::from(ResBlock::new(4, "r", "in", "out")).expand();

        assert_eq!(
            names(&elements),
            [
                "r_0", "in->r_0", "r_1", "r_0->r_1", "r_2", "r_1->r_2", "out", "r_2->out",
                "r_1~>r_2"
            ]
        );
    }

    #[test]
    fn test_res_expansion_small_chains() {
        let two = Element::from(ResBlock::new(2, "r", "in", "out")).expand();
        assert_eq!(names(&two), ["r_0", "in->r_0", "out", "r_0->out", "out~>r_0"]);

        let one = Element::from(ResBlock::new(1, "r", "in", "out")).expand();
        assert_eq!(names(&one), ["out", "in->out"]);

        let none = Element::from(ResBlock::new(0, "r", "in", "out")).expand();
        assert!(none.is_empty());
    }
}
