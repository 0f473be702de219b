//! Builds a LeNet diagram and writes `lenet.tex`, plus `lenet.pdf` when a
//! LaTeX engine is installed.
//!
//! ```text
//! cargo run -p plotnn --example lenet
//! ```

use plotnn::{
    Diagram, PlotnnError,
    element::{Connection, Conv, Pool, SoftMax},
    geometry::Placement,
};

fn stage(diagram: Diagram, previous: &str, block: impl Into<plotnn::element::Element>) -> Diagram {
    let block = block.into();
    let name = block.name().unwrap_or_default().to_string();
    diagram.add(block).add(Connection::new(previous, name))
}

fn build_lenet() -> Diagram {
    let diagram = Diagram::new().add(
        Conv::new("conv0")
            .with_filters(1)
            .with_spatial(32)
            .with_size(1.0, 32.0, 32.0),
    );

    let diagram = stage(
        diagram,
        "conv0",
        Conv::new("conv1")
            .with_filters(6)
            .with_spatial(28)
            .with_to(Placement::after("conv0"))
            .with_size(6.0, 28.0, 28.0),
    );
    let diagram = stage(
        diagram,
        "conv1",
        Pool::new("pool1")
            .with_to(Placement::after("conv1"))
            .with_size(6.0, 14.0, 14.0),
    );
    let diagram = stage(
        diagram,
        "pool1",
        Conv::new("conv2")
            .with_filters(16)
            .with_spatial(10)
            .with_to(Placement::after("pool1"))
            .with_size(16.0, 10.0, 10.0),
    );
    let diagram = stage(
        diagram,
        "conv2",
        Pool::new("pool2")
            .with_to(Placement::after("conv2"))
            .with_size(16.0, 5.0, 5.0),
    );
    let diagram = stage(
        diagram,
        "pool2",
        Conv::new("fc1")
            .with_filters(1)
            .with_spatial(120)
            .with_to(Placement::Previous)
            .with_size(1.0, 1.0, 120.0),
    );
    let diagram = stage(
        diagram,
        "fc1",
        Conv::new("fc2")
            .with_filters(1)
            .with_spatial(84)
            .with_to(Placement::Previous)
            .with_size(1.0, 1.0, 84.0),
    );
    stage(
        diagram,
        "fc2",
        SoftMax::new("soft1")
            .with_to(Placement::Previous)
            .with_caption("SOFT"),
    )
}

fn main() -> Result<(), PlotnnError> {
    let diagram = build_lenet();
    diagram.save_tex("lenet.tex")?;

    if let Err(err) = diagram.render_pdf("lenet.pdf") {
        eprintln!("Skipping PDF: {err}");
    }
    Ok(())
}
