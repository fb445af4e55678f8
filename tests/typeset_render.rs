#![cfg(feature = "typeset")]

//! Integration tests for the typesetting backend's SVG output.

use std::path::Path;

use shotbench::typeset::{TypesetRenderer, RENDER_VIEWPORT};
use shotbench::{Error, RenderOutput, Renderer};

fn svg_from(html: &str) -> String {
    let mut renderer = TypesetRenderer::from_font_bytes(html, "Montserrat-Regular", vec![1, 2, 3, 4]);
    match renderer.render(Path::new("unused.svg")).unwrap() {
        RenderOutput::Payload(bytes) => String::from_utf8(bytes).unwrap(),
        other => panic!("expected payload, got {:?}", other),
    }
}

#[test]
fn renders_a_fixed_size_svg_document() {
    let svg = svg_from("<html><body><h1>Title</h1></body></html>");
    assert!(svg.starts_with("<svg "));
    assert!(svg.ends_with("</svg>"));
    assert!(svg.contains(&format!("width=\"{}\"", RENDER_VIEWPORT.width)));
    assert!(svg.contains(&format!("height=\"{}\"", RENDER_VIEWPORT.height)));
}

#[test]
fn embeds_the_font_asset() {
    let svg = svg_from("<html><body><p>text</p></body></html>");
    assert!(svg.contains("@font-face"));
    assert!(svg.contains("font-family: 'Montserrat-Regular'"));
    // base64 of the four font bytes handed to the renderer
    assert!(svg.contains("AQIDBA=="));
}

#[test]
fn heading_and_paragraph_text_appear_in_order() {
    let svg = svg_from(
        "<html><head><title>Fallback</title></head>\
         <body><h1>Big Heading</h1><p>Some body copy</p></body></html>",
    );
    let heading = svg.find("Big Heading").unwrap();
    let body = svg.find("Some body copy").unwrap();
    assert!(heading < body);
}

#[test]
fn markup_characters_are_escaped() {
    let svg = svg_from("<html><body><p>fish &amp; chips</p></body></html>");
    assert!(svg.contains("fish &amp; chips"));
}

#[test]
fn long_paragraphs_wrap_across_lines() {
    let words = "lorem ipsum dolor sit amet ".repeat(30);
    let svg = svg_from(&format!("<html><body><p>{}</p></body></html>", words));
    let text_elements = svg.matches("<text ").count();
    assert!(text_elements > 1, "expected wrapped lines, got {}", text_elements);
}

#[test]
fn missing_font_file_is_an_io_error() {
    let err = TypesetRenderer::new("<p>x</p>", Path::new("/nonexistent/font.ttf")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
