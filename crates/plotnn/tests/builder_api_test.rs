//! Integration tests for the Diagram and DiagramRenderer API

use std::{fs, path::PathBuf};

use proptest::prelude::*;

use plotnn::{
    Diagram, DiagramRenderer, PlotnnError,
    config::{AppConfig, DocumentConfig, ToolchainConfig},
    element::{Connection, Conv, Element, Pool, ResBlock, Skip, Sum},
    export::{self, OutputFormat, Toolchain},
    geometry::Placement,
};

fn no_tools() -> Toolchain {
    Toolchain::with_search_paths(Vec::<PathBuf>::new())
}

#[test]
fn test_save_tex_writes_single_conv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("x.tex");

    Diagram::new()
        .add(Conv::new("c1"))
        .save_tex(&path)
        .expect("Failed to save diagram");

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.matches("{Box={").count(), 1);
    assert_eq!(text.matches("name=c1,").count(), 1);
    assert!(text.starts_with("\\documentclass"));
    assert!(text.ends_with("\\end{document}\n"));
}

#[test]
fn test_rendering_is_deterministic() {
    let diagram = Diagram::new()
        .add(Conv::new("c1"))
        .add(Pool::new("p1").with_to(Placement::after("c1")))
        .add(ResBlock::new(3, "res", "p1", "out"))
        .add(Sum::new("s").with_to(Placement::Previous));

    assert_eq!(diagram.to_tex(), diagram.to_tex());
}

#[test]
fn test_dangling_connection_renders() {
    let diagram = Diagram::new()
        .add(Connection::new("ghost", "phantom"))
        .add(Skip::new("ghost", "phantom"));

    let text = diagram.to_tex();
    assert!(text.contains("\\draw [connection] (ghost-east) -- node {\\midarrow} (phantom-west);"));
    assert!(text.contains("(phantom-top)"));
}

#[test]
fn test_from_toml() {
    let diagram = Diagram::from_toml(
        r#"
        [[element]]
        kind = "input"
        pathfile = "cats.jpg"

        [[element]]
        kind = "conv"
        name = "conv1"
        filters = 32
        to = "(temp-east)"

        [[element]]
        kind = "two_conv_pool"
        name = "b1"
        bottom = "conv1"
        top = "pool1"

        [[element]]
        kind = "connection"
        of = "conv1"
        to = "pool1"
        "#,
    )
    .expect("Failed to parse description");

    assert_eq!(diagram.len(), 4);
    assert_eq!(diagram.elements()[0].name(), Some("temp"));
    assert_eq!(diagram.elements()[2].kind(), "two_conv_pool");
    assert!(diagram.to_tex().contains("name=ccr_b1,"));
}

#[test]
fn test_from_toml_unknown_kind_has_span() {
    let source = "[[element]]\nkind = \"lstm\"\nname = \"l1\"\n";
    let err = Diagram::from_toml(source).unwrap_err();

    let PlotnnError::Definition { message, span, src } = err else {
        panic!("expected Definition error, got {err:?}");
    };
    assert!(message.contains("lstm"), "message: {message}");
    assert_eq!(src, source);
    if let Some(span) = span {
        assert!(span.end <= source.len());
    }
}

#[test]
fn test_from_toml_rejects_bad_placement() {
    let source = "[[element]]\nkind = \"pool\"\nname = \"p\"\nto = \"(1,2)\"\n";
    assert!(matches!(
        Diagram::from_toml(source),
        Err(PlotnnError::Definition { .. })
    ));
}

#[test]
fn test_collect_and_extend() {
    let mut diagram: Diagram = [Conv::new("a"), Conv::new("b")]
        .into_iter()
        .map(Element::from)
        .collect();
    diagram.extend([Element::from(Connection::new("a", "b"))]);
    diagram.push(Pool::new("p"));

    assert_eq!(diagram.len(), 4);
    assert!(!diagram.is_empty());
    assert!(Diagram::new().is_empty());
}

#[test]
fn test_missing_toolchain_reports_tool_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = DiagramRenderer::default().with_toolchain(no_tools());
    let diagram = Diagram::new().add(Conv::new("c1"));

    for format in [OutputFormat::Pdf, OutputFormat::Png, OutputFormat::Svg] {
        let path = dir.path().join(format!("net.{format}"));
        let err = renderer.render(&diagram, &path, format).unwrap_err();
        assert!(
            matches!(err, PlotnnError::Export(export::Error::ToolNotFound { .. })),
            "{format}: {err:?}"
        );
        assert!(!path.exists());
    }
}

#[test]
fn test_external_styles_are_written_next_to_tex() {
    let dir = tempfile::tempdir().unwrap();
    let document = DocumentConfig::default().with_inline_styles(false);
    let config = AppConfig::default().with_document(document);
    let renderer = DiagramRenderer::new(config).with_toolchain(no_tools());

    let path = dir.path().join("nested/net.tex");
    renderer
        .render(&Diagram::new().add(Conv::new("c1")), &path, OutputFormat::Tex)
        .unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\\subimport{layers/}{init}"));
    assert!(dir.path().join("nested/layers/Box.sty").is_file());
    assert!(dir.path().join("nested/layers/init.tex").is_file());
}

/// Writes an executable shell script named `name` into `dir`.
#[cfg(unix)]
fn fake_tool(dir: &std::path::Path, name: &str, script: &str) {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(unix)]
#[test]
fn test_render_pdf_saves_tex_next_to_pdf() {
    let tools = tempfile::tempdir().unwrap();
    fake_tool(tools.path(), "pdflatex", "touch diagram.pdf");

    let out = tempfile::tempdir().unwrap();
    let pdf = out.path().join("net.pdf");
    let toolchain = Toolchain::with_search_paths([tools.path()]);
    let renderer = DiagramRenderer::default().with_toolchain(toolchain);

    let written = renderer
        .render_pdf(&Diagram::new().add(Conv::new("c1")), &pdf)
        .unwrap();

    assert_eq!(written, pdf);
    assert!(pdf.is_file());
    let tex = fs::read_to_string(out.path().join("net.tex")).unwrap();
    assert!(tex.contains("name=c1,"));
}

#[cfg(unix)]
#[test]
fn test_render_png_saves_tex_unless_disabled() {
    let tools = tempfile::tempdir().unwrap();
    fake_tool(tools.path(), "pdflatex", "touch diagram.pdf");
    // pdftocairo appends `.png` to its last argument.
    fake_tool(
        tools.path(),
        "pdftocairo",
        "for arg; do last=$arg; done; touch \"$last.png\"",
    );
    let toolchain = Toolchain::with_search_paths([tools.path()]);
    let diagram = Diagram::new().add(Conv::new("c1"));

    let out = tempfile::tempdir().unwrap();
    let png = out.path().join("net.png");
    DiagramRenderer::default()
        .with_toolchain(toolchain.clone())
        .render_png(&diagram, &png, 72)
        .unwrap();
    assert!(png.is_file());
    assert!(out.path().join("net.tex").is_file());

    let bare = ToolchainConfig::default().with_keep_tex(false);
    let config = AppConfig::default().with_toolchain(bare);
    let png = out.path().join("bare.png");
    DiagramRenderer::new(config)
        .with_toolchain(toolchain)
        .render_png(&diagram, &png, 72)
        .unwrap();
    assert!(png.is_file());
    assert!(!out.path().join("bare.tex").exists());
}

#[test]
fn test_from_toml_accepts_names_starting_with_digits() {
    let diagram = Diagram::from_toml(
        r#"
        [[element]]
        kind = "conv"
        name = "1x1"

        [[element]]
        kind = "pool"
        name = "3x3_pool"
        to = "(1x1-east)"
        "#,
    )
    .unwrap();

    assert!(diagram.to_tex().contains("at (1x1-east)\n"));
}

fn conv_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z][a-z0-9_]{0,8}", 0..12)
}

proptest! {
    #[test]
    fn prop_fragments_follow_insertion_order(names in conv_names()) {
        let mut diagram = Diagram::new();
        for name in &names {
            diagram.push(Conv::new(name.clone()));
        }
        let text = diagram.to_tex();

        prop_assert_eq!(text.matches("{Box={").count(), names.len());

        let mut cursor = 0;
        for name in &names {
            let needle = format!("name={name},");
            let found = text[cursor..].find(&needle);
            prop_assert!(found.is_some(), "missing {} after byte {}", name, cursor);
            cursor += found.unwrap_or_default() + needle.len();
        }
    }

    #[test]
    fn prop_rendering_twice_is_identical(names in conv_names()) {
        let diagram: Diagram = names
            .iter()
            .map(|name| Element::from(Conv::new(name.clone()).with_to(Placement::Previous)))
            .collect();
        prop_assert_eq!(diagram.to_tex(), diagram.to_tex());
    }
}
