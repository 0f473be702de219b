//! Block descriptors.
//!
//! Every diagram element is a plain data record: a name plus layout and
//! style attributes with defaults. Nothing here checks that names are
//! unique or that connections point at existing blocks; the renderer
//! emits whatever it is given.
//!
//! Composite blocks ([`TwoConvPoolBlock`], [`UnconvBlock`], [`ResBlock`])
//! describe a recurring group of layers and are expanded into primitive
//! elements by [`Element::expand`].
//!
//! All records deserialize from tables tagged with a `kind` key, which is
//! how diagram description files list them:
//!
//! ```toml
//! [[element]]
//! kind = "conv"
//! name = "conv1"
//! to = "(input-east)"
//! filters = 32
//! ```

use serde::Deserialize;

use crate::{
    color::{Fill, PaletteColor, TikzColor},
    geometry::{Point3, Placement},
};

const DEFAULT_CAPTION: &str = " ";

fn default_caption() -> String {
    DEFAULT_CAPTION.to_string()
}

/// Generates the placement and caption setters shared by box-shaped blocks.
macro_rules! impl_box_setters {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $ty {
                /// Shifts the block by `offset` relative to its placement
                pub fn with_offset(mut self, offset: Point3) -> Self {
                    self.offset = offset;
                    self
                }

                /// Sets where the block's origin is placed
                pub fn with_to(mut self, to: impl Into<Placement>) -> Self {
                    self.to = to.into();
                    self
                }

                /// Sets the caption drawn below the block
                pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
                    self.caption = caption.into();
                    self
                }

                /// Overrides the fill color
                pub fn with_fill(mut self, fill: impl Into<Fill>) -> Self {
                    self.fill = fill.into();
                    self
                }
            }
        )*
    };
}

/// An input image drawn on the zy plane.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Input {
    pub name: String,
    /// Path of the image, as LaTeX should see it
    pub pathfile: String,
    pub to: Placement,
    /// Width in centimeters
    pub width: f32,
    /// Height in centimeters
    pub height: f32,
}

impl Input {
    pub fn new(name: impl Into<String>, pathfile: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pathfile: pathfile.into(),
            ..Self::default()
        }
    }

    pub fn with_to(mut self, to: impl Into<Placement>) -> Self {
        self.to = to.into();
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

impl Default for Input {
    fn default() -> Self {
        Self {
            name: "temp".to_string(),
            pathfile: String::new(),
            to: Placement::At(Point3::new(-3.0, 0.0, 0.0)),
            width: 8.0,
            height: 8.0,
        }
    }
}

/// A single convolution volume.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Conv {
    pub name: String,
    /// Spatial size, drawn along the depth edge
    pub spatial: u32,
    /// Number of filters, drawn under the front face
    pub filters: u32,
    pub offset: Point3,
    pub to: Placement,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub caption: String,
    pub fill: Fill,
}

impl Conv {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_filters(mut self, filters: u32) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_spatial(mut self, spatial: u32) -> Self {
        self.spatial = spatial;
        self
    }

    pub fn with_size(mut self, width: f32, height: f32, depth: f32) -> Self {
        self.width = width;
        self.height = height;
        self.depth = depth;
        self
    }
}

impl Default for Conv {
    fn default() -> Self {
        Self {
            name: String::new(),
            spatial: 256,
            filters: 64,
            offset: Point3::ORIGIN,
            to: Placement::default(),
            width: 1.0,
            height: 40.0,
            depth: 40.0,
            caption: default_caption(),
            fill: PaletteColor::Conv.into(),
        }
    }
}

/// Two stacked convolutions, each followed by a ReLU band.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvConvRelu {
    pub name: String,
    pub spatial: u32,
    pub filters: (u32, u32),
    pub offset: Point3,
    pub to: Placement,
    pub width: (f32, f32),
    pub height: f32,
    pub depth: f32,
    pub caption: String,
    pub fill: Fill,
    pub band_fill: Fill,
}

impl ConvConvRelu {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_filters(mut self, first: u32, second: u32) -> Self {
        self.filters = (first, second);
        self
    }

    pub fn with_spatial(mut self, spatial: u32) -> Self {
        self.spatial = spatial;
        self
    }

    pub fn with_size(mut self, width: (f32, f32), height: f32, depth: f32) -> Self {
        self.width = width;
        self.height = height;
        self.depth = depth;
        self
    }
}

impl Default for ConvConvRelu {
    fn default() -> Self {
        Self {
            name: String::new(),
            spatial: 256,
            filters: (64, 64),
            offset: Point3::ORIGIN,
            to: Placement::default(),
            width: (2.0, 2.0),
            height: 40.0,
            depth: 40.0,
            caption: default_caption(),
            fill: PaletteColor::Conv.into(),
            band_fill: PaletteColor::ConvRelu.into(),
        }
    }
}

/// A pooling volume.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Pool {
    pub name: String,
    pub offset: Point3,
    pub to: Placement,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub opacity: f32,
    pub caption: String,
    pub fill: Fill,
}

impl Pool {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: f32, height: f32, depth: f32) -> Self {
        self.width = width;
        self.height = height;
        self.depth = depth;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self {
            name: String::new(),
            offset: Point3::ORIGIN,
            to: Placement::default(),
            width: 1.0,
            height: 32.0,
            depth: 32.0,
            opacity: 0.5,
            caption: default_caption(),
            fill: PaletteColor::Pool.into(),
        }
    }
}

/// An unpooling volume. Same shape as [`Pool`], different color.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UnPool {
    pub name: String,
    pub offset: Point3,
    pub to: Placement,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub opacity: f32,
    pub caption: String,
    pub fill: Fill,
}

impl UnPool {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: f32, height: f32, depth: f32) -> Self {
        self.width = width;
        self.height = height;
        self.depth = depth;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

impl Default for UnPool {
    fn default() -> Self {
        Self {
            name: String::new(),
            offset: Point3::ORIGIN,
            to: Placement::default(),
            width: 1.0,
            height: 32.0,
            depth: 32.0,
            opacity: 0.5,
            caption: default_caption(),
            fill: PaletteColor::Unpool.into(),
        }
    }
}

/// A translucent residual convolution.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvRes {
    pub name: String,
    pub spatial: u32,
    pub filters: u32,
    pub offset: Point3,
    pub to: Placement,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub opacity: f32,
    pub caption: String,
    pub fill: Fill,
    pub band_fill: Fill,
}

impl ConvRes {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_filters(mut self, filters: u32) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_spatial(mut self, spatial: u32) -> Self {
        self.spatial = spatial;
        self
    }

    pub fn with_size(mut self, width: f32, height: f32, depth: f32) -> Self {
        self.width = width;
        self.height = height;
        self.depth = depth;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

impl Default for ConvRes {
    fn default() -> Self {
        Self {
            name: String::new(),
            spatial: 256,
            filters: 64,
            offset: Point3::ORIGIN,
            to: Placement::default(),
            width: 6.0,
            height: 40.0,
            depth: 40.0,
            opacity: 0.2,
            caption: default_caption(),
            fill: TikzColor::rgb_mix([("white", 1.0), ("black", 3.0)]).into(),
            band_fill: TikzColor::rgb_mix([("white", 1.0), ("black", 2.0)]).into(),
        }
    }
}

/// A convolution volume colored as a softmax output.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvSoftMax {
    pub name: String,
    pub spatial: u32,
    pub offset: Point3,
    pub to: Placement,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub caption: String,
    pub fill: Fill,
}

impl ConvSoftMax {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_spatial(mut self, spatial: u32) -> Self {
        self.spatial = spatial;
        self
    }

    pub fn with_size(mut self, width: f32, height: f32, depth: f32) -> Self {
        self.width = width;
        self.height = height;
        self.depth = depth;
        self
    }
}

impl Default for ConvSoftMax {
    fn default() -> Self {
        Self {
            name: String::new(),
            spatial: 40,
            offset: Point3::ORIGIN,
            to: Placement::default(),
            width: 1.0,
            height: 40.0,
            depth: 40.0,
            caption: default_caption(),
            fill: PaletteColor::Softmax.into(),
        }
    }
}

/// A flat softmax output layer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SoftMax {
    pub name: String,
    pub spatial: u32,
    pub offset: Point3,
    pub to: Placement,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub opacity: f32,
    pub caption: String,
    pub fill: Fill,
}

impl SoftMax {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_spatial(mut self, spatial: u32) -> Self {
        self.spatial = spatial;
        self
    }

    pub fn with_size(mut self, width: f32, height: f32, depth: f32) -> Self {
        self.width = width;
        self.height = height;
        self.depth = depth;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

impl Default for SoftMax {
    fn default() -> Self {
        Self {
            name: String::new(),
            spatial: 10,
            offset: Point3::ORIGIN,
            to: Placement::default(),
            width: 2.0,
            height: 3.0,
            depth: 25.0,
            opacity: 0.8,
            caption: default_caption(),
            fill: PaletteColor::Softmax.into(),
        }
    }
}

/// An element-wise sum, drawn as a ball with a `+` logo.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Sum {
    pub name: String,
    pub offset: Point3,
    pub to: Placement,
    pub radius: f32,
    pub opacity: f32,
    pub fill: Fill,
}

impl Sum {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_offset(mut self, offset: Point3) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_to(mut self, to: impl Into<Placement>) -> Self {
        self.to = to.into();
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }
}

impl Default for Sum {
    fn default() -> Self {
        Self {
            name: String::new(),
            offset: Point3::ORIGIN,
            to: Placement::default(),
            radius: 2.5,
            opacity: 0.6,
            fill: PaletteColor::Sum.into(),
        }
    }
}

impl_box_setters!(
    Conv,
    ConvConvRelu,
    Pool,
    UnPool,
    ConvRes,
    ConvSoftMax,
    SoftMax
);

/// An arrow from the east side of `of` to the west side of `to`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Connection {
    pub of: String,
    pub to: String,
}

impl Connection {
    pub fn new(of: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            of: of.into(),
            to: to.into(),
        }
    }
}

/// A copy connection arching over two blocks.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Skip {
    pub of: String,
    pub to: String,
    /// Height of the arc relative to the blocks, `1.0` being their top edge
    #[serde(default = "default_skip_pos")]
    pub pos: f32,
}

fn default_skip_pos() -> f32 {
    1.25
}

impl Skip {
    pub fn new(of: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            of: of.into(),
            to: to.into(),
            pos: default_skip_pos(),
        }
    }

    pub fn with_pos(mut self, pos: f32) -> Self {
        self.pos = pos;
        self
    }
}

/// Parameters shared by the composite blocks.
///
/// `size` is `(height, depth, width)` of the convolution volumes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StageParams {
    pub name: String,
    /// Block the stage is attached to
    pub bottom: String,
    /// Name given to the last block of the stage
    pub top: String,
    pub spatial: u32,
    pub filters: u32,
    pub offset: Point3,
    pub size: (f32, f32, f32),
    pub opacity: f32,
}

impl StageParams {
    pub fn new(
        name: impl Into<String>,
        bottom: impl Into<String>,
        top: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            bottom: bottom.into(),
            top: top.into(),
            ..Self::default()
        }
    }
}

impl Default for StageParams {
    fn default() -> Self {
        Self {
            name: String::new(),
            bottom: String::new(),
            top: String::new(),
            spatial: 256,
            filters: 64,
            offset: Point3::new(1.0, 0.0, 0.0),
            size: (32.0, 32.0, 3.5),
            opacity: 0.5,
        }
    }
}

/// Generates the builder setters of the composite blocks.
macro_rules! impl_stage_setters {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $ty {
                pub fn with_filters(mut self, filters: u32) -> Self {
                    self.params.filters = filters;
                    self
                }

                pub fn with_spatial(mut self, spatial: u32) -> Self {
                    self.params.spatial = spatial;
                    self
                }

                pub fn with_offset(mut self, offset: Point3) -> Self {
                    self.params.offset = offset;
                    self
                }

                /// Sets `(height, depth, width)` of the volumes
                pub fn with_size(mut self, size: (f32, f32, f32)) -> Self {
                    self.params.size = size;
                    self
                }

                pub fn with_opacity(mut self, opacity: f32) -> Self {
                    self.params.opacity = opacity;
                    self
                }

                pub fn params(&self) -> &StageParams {
                    &self.params
                }
            }
        )*
    };
}

/// An encoder stage: double convolution, pooling, and a connection from
/// the preceding block.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct TwoConvPoolBlock {
    params: StageParams,
}

impl TwoConvPoolBlock {
    pub fn new(
        name: impl Into<String>,
        bottom: impl Into<String>,
        top: impl Into<String>,
    ) -> Self {
        Self {
            params: StageParams::new(name, bottom, top),
        }
    }
}

/// A decoder stage: unpooling followed by alternating residual and plain
/// convolutions.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct UnconvBlock {
    params: StageParams,
}

impl UnconvBlock {
    pub fn new(
        name: impl Into<String>,
        bottom: impl Into<String>,
        top: impl Into<String>,
    ) -> Self {
        Self {
            params: StageParams::new(name, bottom, top),
        }
    }
}

/// A chain of `num` convolutions with a skip connection across the inner
/// layers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ResBlockRecord")]
pub struct ResBlock {
    num: usize,
    params: StageParams,
}

impl ResBlock {
    pub fn new(
        num: usize,
        name: impl Into<String>,
        bottom: impl Into<String>,
        top: impl Into<String>,
    ) -> Self {
        Self {
            num,
            params: StageParams {
                offset: Point3::ORIGIN,
                ..StageParams::new(name, bottom, top)
            },
        }
    }

    /// Returns the number of convolutions in the chain
    pub fn num(&self) -> usize {
        self.num
    }
}

/// Flat description-file form of a [`ResBlock`].
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ResBlockRecord {
    num: Option<usize>,
    name: String,
    bottom: String,
    top: String,
    spatial: Option<u32>,
    filters: Option<u32>,
    offset: Option<Point3>,
    size: Option<(f32, f32, f32)>,
    opacity: Option<f32>,
}

impl TryFrom<ResBlockRecord> for ResBlock {
    type Error = String;

    fn try_from(record: ResBlockRecord) -> Result<Self, Self::Error> {
        let num = record.num.ok_or("missing field `num`")?;
        let defaults = StageParams::default();
        Ok(Self {
            num,
            params: StageParams {
                name: record.name,
                bottom: record.bottom,
                top: record.top,
                spatial: record.spatial.unwrap_or(defaults.spatial),
                filters: record.filters.unwrap_or(defaults.filters),
                offset: record.offset.unwrap_or(Point3::ORIGIN),
                size: record.size.unwrap_or(defaults.size),
                opacity: record.opacity.unwrap_or(defaults.opacity),
            },
        })
    }
}

impl_stage_setters!(TwoConvPoolBlock, UnconvBlock, ResBlock);

/// Any element that can be added to a diagram.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    Input(Input),
    Conv(Conv),
    ConvConvRelu(ConvConvRelu),
    Pool(Pool),
    #[serde(rename = "unpool")]
    UnPool(UnPool),
    ConvRes(ConvRes),
    #[serde(rename = "conv_softmax")]
    ConvSoftMax(ConvSoftMax),
    #[serde(rename = "softmax")]
    SoftMax(SoftMax),
    Sum(Sum),
    Connection(Connection),
    Skip(Skip),
    #[serde(rename = "two_conv_pool")]
    TwoConvPool(TwoConvPoolBlock),
    Unconv(UnconvBlock),
    Res(ResBlock),
}

impl Element {
    /// Returns the kind tag used in description files
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Input(_) => "input",
            Self::Conv(_) => "conv",
            Self::ConvConvRelu(_) => "conv_conv_relu",
            Self::Pool(_) => "pool",
            Self::UnPool(_) => "unpool",
            Self::ConvRes(_) => "conv_res",
            Self::ConvSoftMax(_) => "conv_softmax",
            Self::SoftMax(_) => "softmax",
            Self::Sum(_) => "sum",
            Self::Connection(_) => "connection",
            Self::Skip(_) => "skip",
            Self::TwoConvPool(_) => "two_conv_pool",
            Self::Unconv(_) => "unconv",
            Self::Res(_) => "res",
        }
    }

    /// Returns the block name for elements that draw a block.
    ///
    /// Links have no name; composites report the name of their last block.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Input(e) => Some(&e.name),
            Self::Conv(e) => Some(&e.name),
            Self::ConvConvRelu(e) => Some(&e.name),
            Self::Pool(e) => Some(&e.name),
            Self::UnPool(e) => Some(&e.name),
            Self::ConvRes(e) => Some(&e.name),
            Self::ConvSoftMax(e) => Some(&e.name),
            Self::SoftMax(e) => Some(&e.name),
            Self::Sum(e) => Some(&e.name),
            Self::TwoConvPool(e) => Some(&e.params.top),
            Self::Unconv(e) => Some(&e.params.top),
            Self::Res(e) => Some(&e.params.top),
            Self::Connection(_) | Self::Skip(_) => None,
        }
    }

    /// Checks whether this element expands into several primitives
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::TwoConvPool(_) | Self::Unconv(_) | Self::Res(_))
    }

    /// Expands composite blocks into primitive elements.
    ///
    /// Primitive elements expand to a single clone of themselves.
    pub fn expand(&self) -> Vec<Element> {
        match self {
            Self::TwoConvPool(block) => crate::composite::expand_two_conv_pool(&block.params),
            Self::Unconv(block) => crate::composite::expand_unconv(&block.params),
            Self::Res(block) => crate::composite::expand_res(block.num, &block.params),
            primitive => vec![primitive.clone()],
        }
    }
}

macro_rules! impl_from_for_element {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Element {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_for_element!(
    Input(Input),
    Conv(Conv),
    ConvConvRelu(ConvConvRelu),
    Pool(Pool),
    UnPool(UnPool),
    ConvRes(ConvRes),
    ConvSoftMax(ConvSoftMax),
    SoftMax(SoftMax),
    Sum(Sum),
    Connection(Connection),
    Skip(Skip),
    TwoConvPool(TwoConvPoolBlock),
    Unconv(UnconvBlock),
    Res(ResBlock),
);

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_conv_defaults() {
        let conv = Conv::new("c1");
        assert_eq!(conv.name, "c1");
        assert_eq!(conv.spatial, 256);
        assert_eq!(conv.filters, 64);
        assert_approx_eq!(f32, conv.width, 1.0);
        assert_approx_eq!(f32, conv.height, 40.0);
        assert_eq!(conv.caption, " ");
        assert_eq!(conv.to, Placement::At(Point3::ORIGIN));
        assert_eq!(conv.fill, Fill::Palette(PaletteColor::Conv));
    }

    #[test]
    fn test_unpool_defaults_match_pool_shape() {
        let unpool = UnPool::new("u");
        let pool = Pool::new("u");
        assert_approx_eq!(f32, unpool.height, pool.height);
        assert_approx_eq!(f32, unpool.opacity, pool.opacity);
        assert_eq!(unpool.fill, Fill::Palette(PaletteColor::Unpool));
    }

    #[test]
    fn test_builder_setters() {
        let conv = Conv::new("conv2")
            .with_filters(16)
            .with_spatial(10)
            .with_to(Placement::after("pool1"))
            .with_offset(Point3::new(1.0, 0.0, 0.0))
            .with_size(16.0, 10.0, 10.0)
            .with_caption("Conv2");

        assert_eq!(conv.filters, 16);
        assert_eq!(conv.to, Placement::after("pool1"));
        assert_eq!(conv.caption, "Conv2");
        assert_approx_eq!(f32, conv.width, 16.0);
    }

    #[test]
    fn test_input_default_placement() {
        let input = Input::new("in", "cats.jpg");
        assert_eq!(input.to, Placement::At(Point3::new(-3.0, 0.0, 0.0)));
        assert_approx_eq!(f32, input.width, 8.0);
    }

    #[test]
    fn test_element_names() {
        assert_eq!(Element::from(Conv::new("c")).name(), Some("c"));
        assert_eq!(Element::from(Connection::new("a", "b")).name(), None);
        assert_eq!(
            Element::from(TwoConvPoolBlock::new("d1", "in", "p1")).name(),
            Some("p1")
        );
    }

    #[test]
    fn test_primitive_expands_to_itself() {
        let element = Element::from(Pool::new("p"));
        assert!(!element.is_composite());
        assert_eq!(element.expand(), vec![element.clone()]);
    }

    #[test]
    fn test_res_block_defaults_to_zero_offset() {
        let block = ResBlock::new(3, "res", "in", "out");
        assert!(block.params().offset.is_zero());
        assert!(!TwoConvPoolBlock::new("a", "b", "c").params().offset.is_zero());
    }
}
