//! TikZ rendering of diagram elements.
//!
//! Each primitive element becomes one fragment: a `\pic` for blocks, a
//! `\draw` for links. Composite blocks are expanded first. Fragments are
//! assembled into a complete document by [`TexRenderer::document`].

use std::fmt;

use log::{debug, trace};

use plotnn_core::{
    element::{
        Connection, Conv, ConvConvRelu, ConvRes, ConvSoftMax, Element, Input, Pool, Skip, SoftMax,
        Sum, UnPool,
    },
    geometry::{Anchor, Placement, Point3},
};

use crate::{
    config::AppConfig,
    template::{self, StyleSource},
};

/// A complete LaTeX document and the style files it expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TexDocument {
    text: String,
    styles: StyleSource,
}

impl TexDocument {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn styles(&self) -> &StyleSource {
        &self.styles
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl fmt::Display for TexDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Renders elements into TikZ fragments and documents.
#[derive(Debug, Clone, Copy)]
pub struct TexRenderer<'a> {
    config: &'a AppConfig,
}

impl<'a> TexRenderer<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self { config }
    }

    /// Renders the fragments of `elements`, in order.
    ///
    /// A [`Placement::Previous`] resolves to the east anchor of the last
    /// block rendered before it, or to the origin for the first block.
    pub fn fragments(&self, elements: &[Element]) -> Vec<String> {
        let mut fragments = Vec::with_capacity(elements.len());
        let mut previous: Option<String> = None;

        for element in elements.iter().flat_map(Element::expand) {
            fragments.push(fragment(&element, previous.as_deref()));
            if let Some(name) = element.name() {
                previous = Some(name.to_string());
            }
        }

        trace!(count = fragments.len(); "Rendered fragments");
        fragments
    }

    /// Assembles the complete document for `elements`.
    pub fn document(&self, elements: &[Element]) -> TexDocument {
        let styles = StyleSource::from_config(self.config.document());

        let mut text = template::header(&styles);
        if self.config.document().include_colors() {
            text.push_str(&template::color_definitions(self.config.style()));
        }
        text.push_str(template::document_begin());
        let fragments = self.fragments(elements);
        for fragment in &fragments {
            text.push_str(fragment);
        }
        text.push_str(template::document_end());

        debug!(
            fragments = fragments.len(),
            styles:? = styles,
            bytes = text.len();
            "Document assembled"
        );
        TexDocument { text, styles }
    }
}

fn fragment(element: &Element, previous: Option<&str>) -> String {
    let at = |placement: &Placement| resolve(placement, previous);
    match element {
        Element::Input(e) => input(e, &at(&e.to)),
        Element::Conv(e) => conv(e, &at(&e.to)),
        Element::ConvConvRelu(e) => conv_conv_relu(e, &at(&e.to)),
        Element::Pool(e) => pool(e, &at(&e.to)),
        Element::UnPool(e) => unpool(e, &at(&e.to)),
        Element::ConvRes(e) => conv_res(e, &at(&e.to)),
        Element::ConvSoftMax(e) => conv_softmax(e, &at(&e.to)),
        Element::SoftMax(e) => softmax(e, &at(&e.to)),
        Element::Sum(e) => sum(e, &at(&e.to)),
        Element::Connection(e) => connection(e),
        Element::Skip(e) => skip(e),
        // `Element::expand` never yields composites.
        Element::TwoConvPool(_) | Element::Unconv(_) | Element::Res(_) => String::new(),
    }
}

/// Formats a placement as a TikZ coordinate.
fn resolve(placement: &Placement, previous: Option<&str>) -> String {
    match (placement, previous) {
        (Placement::At(point), _) => point.to_string(),
        (Placement::Anchor(anchor), _) => anchor.to_string(),
        (Placement::Previous, Some(block)) => Anchor::east(block).to_string(),
        (Placement::Previous, None) => Point3::ORIGIN.to_string(),
    }
}

/// A `\pic` of one of the block styles.
struct Pic {
    shape: &'static str,
    offset: Point3,
    at: String,
    keys: Vec<(&'static str, String)>,
}

impl Pic {
    fn new(shape: &'static str, offset: Point3, at: &str) -> Self {
        Self {
            shape,
            offset,
            at: at.to_string(),
            keys: Vec::new(),
        }
    }

    fn key(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.keys.push((key, value.to_string()));
        self
    }

    fn render(self) -> String {
        let mut out = format!(
            "\\pic[shift={{{}}}] at {}\n    {{{}={{\n",
            self.offset, self.at, self.shape
        );
        let last = self.keys.len().saturating_sub(1);
        for (i, (key, value)) in self.keys.iter().enumerate() {
            let separator = if i == last { "" } else { "," };
            out.push_str(&format!("        {key}={value}{separator}\n"));
        }
        out.push_str("        }\n    };\n");
        out
    }
}

/// Braces a label so pgfkeys keeps it as a single value.
fn label(text: impl fmt::Display) -> String {
    format!("{{{{{text}}}}}")
}

fn input(input: &Input, at: &str) -> String {
    let name = &input.name;
    let half_width = input.width / 2.0;
    let half_height = input.height / 2.0;
    format!(
        "\\node[canvas is zy plane at x=0] ({name}) at {at} \
         {{\\includegraphics[width={width}cm,height={height}cm]{{{path}}}}};\n\
         \\coordinate ({name}-east) at ($({name}.center)+({half_width}cm,0,0)$);\n\
         \\coordinate ({name}-west) at ($({name}.center)-({half_width}cm,0,0)$);\n\
         \\coordinate ({name}-north) at ($({name}.center)+(0,{half_height}cm,0)$);\n\
         \\coordinate ({name}-south) at ($({name}.center)-(0,{half_height}cm,0)$);\n",
        width = input.width,
        height = input.height,
        path = input.pathfile,
    )
}

fn conv(conv: &Conv, at: &str) -> String {
    Pic::new("Box", conv.offset, at)
        .key("name", &conv.name)
        .key("caption", &conv.caption)
        .key("xlabel", label(conv.filters))
        .key("zlabel", conv.spatial)
        .key("fill", &conv.fill)
        .key("height", conv.height)
        .key("width", conv.width)
        .key("depth", conv.depth)
        .render()
}

fn conv_conv_relu(ccr: &ConvConvRelu, at: &str) -> String {
    let (first, second) = ccr.filters;
    Pic::new("RightBandedBox", ccr.offset, at)
        .key("name", &ccr.name)
        .key("caption", &ccr.caption)
        .key("xlabel", label(format!("{first}, {second}")))
        .key("zlabel", ccr.spatial)
        .key("fill", &ccr.fill)
        .key("bandfill", &ccr.band_fill)
        .key("height", ccr.height)
        .key("width", format!("{{{},{}}}", ccr.width.0, ccr.width.1))
        .key("depth", ccr.depth)
        .render()
}

fn pool(pool: &Pool, at: &str) -> String {
    Pic::new("Box", pool.offset, at)
        .key("name", &pool.name)
        .key("caption", &pool.caption)
        .key("fill", &pool.fill)
        .key("opacity", pool.opacity)
        .key("height", pool.height)
        .key("width", pool.width)
        .key("depth", pool.depth)
        .render()
}

fn unpool(unpool: &UnPool, at: &str) -> String {
    Pic::new("Box", unpool.offset, at)
        .key("name", &unpool.name)
        .key("caption", &unpool.caption)
        .key("fill", &unpool.fill)
        .key("opacity", unpool.opacity)
        .key("height", unpool.height)
        .key("width", unpool.width)
        .key("depth", unpool.depth)
        .render()
}

fn conv_res(res: &ConvRes, at: &str) -> String {
    Pic::new("RightBandedBox", res.offset, at)
        .key("name", &res.name)
        .key("caption", &res.caption)
        .key("xlabel", label(res.filters))
        .key("zlabel", res.spatial)
        .key("fill", &res.fill)
        .key("bandfill", &res.band_fill)
        .key("opacity", res.opacity)
        .key("height", res.height)
        .key("width", res.width)
        .key("depth", res.depth)
        .render()
}

fn conv_softmax(softmax: &ConvSoftMax, at: &str) -> String {
    Pic::new("Box", softmax.offset, at)
        .key("name", &softmax.name)
        .key("caption", &softmax.caption)
        .key("zlabel", softmax.spatial)
        .key("fill", &softmax.fill)
        .key("height", softmax.height)
        .key("width", softmax.width)
        .key("depth", softmax.depth)
        .render()
}

fn softmax(softmax: &SoftMax, at: &str) -> String {
    Pic::new("Box", softmax.offset, at)
        .key("name", &softmax.name)
        .key("caption", &softmax.caption)
        .key("zlabel", softmax.spatial)
        .key("fill", &softmax.fill)
        .key("opacity", softmax.opacity)
        .key("height", softmax.height)
        .key("width", softmax.width)
        .key("depth", softmax.depth)
        .render()
}

fn sum(sum: &Sum, at: &str) -> String {
    Pic::new("Ball", sum.offset, at)
        .key("name", &sum.name)
        .key("fill", &sum.fill)
        .key("opacity", sum.opacity)
        .key("radius", sum.radius)
        .key("logo", "$+$")
        .render()
}

fn connection(connection: &Connection) -> String {
    format!(
        "\\draw [connection] ({}-east) -- node {{\\midarrow}} ({}-west);\n",
        connection.of, connection.to
    )
}

fn skip(skip: &Skip) -> String {
    let Skip { of, to, pos } = skip;
    format!(
        "\\path ({of}-southeast) -- ({of}-northeast) coordinate[pos={pos}] ({of}-top) ;\n\
         \\path ({to}-south) -- ({to}-north) coordinate[pos={pos}] ({to}-top) ;\n\
         \\draw [copyconnection] ({of}-northeast)\n\
         -- node {{\\copymidarrow}} ({of}-top)\n\
         -- node {{\\copymidarrow}} ({to}-top)\n\
         -- node {{\\copymidarrow}} ({to}-north);\n"
    )
}
