//! Serialization of the SVG element tree to markup.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use rayon::prelude::*;

use super::node::{SvgNode, SvgText};

const DOCTYPE: &str =
    r#"svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd""#;

/// Child count above which a node's children are serialized in parallel.
/// The document root holds one element per rendered feature, tens of
/// thousands on a dense sheet.
const PARALLEL_CHILD_THRESHOLD: usize = 64;

/// Serializes a document rooted at `root` to an SVG string with an XML
/// declaration and the SVG 1.1 doctype.
pub fn svg_to_string(root: &SvgNode) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::with_capacity(64 * 1024), b' ', 2);
    write_document(&mut writer, root)?;
    String::from_utf8(writer.into_inner()).context("serialized SVG was not valid UTF-8")
}

/// Serializes a document rooted at `root` to a file.
pub fn svg_to_file<P: AsRef<Path>>(root: &SvgNode, path: P) -> Result<()> {
    let file = File::create(&path)
        .with_context(|| format!("creating {}", path.as_ref().display()))?;
    let buffered = BufWriter::with_capacity(1024 * 1024, file);
    let mut writer = Writer::new_with_indent(buffered, b' ', 2);
    write_document(&mut writer, root)?;
    writer.into_inner().flush().context("flushing SVG output")?;
    Ok(())
}

fn write_document<W: Write>(writer: &mut Writer<W>, root: &SvgNode) -> Result<()> {
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))
        .context("writing XML declaration")?;
    writer
        .write_event(Event::DocType(BytesText::from_escaped(DOCTYPE)))
        .context("writing doctype")?;
    write_node(writer, root, 0).context("serializing SVG tree")
}

/// Writes one node at the given indentation depth within `writer`.
///
/// Small child lists recurse through the same writer. Large ones are fanned
/// out: each child subtree is serialized to its own buffer on the rayon
/// pool, then the buffers are spliced back in order, re-indented to the
/// child depth, so the output is byte-identical to the sequential path.
fn write_node<W: Write>(writer: &mut Writer<W>, node: &SvgNode, depth: usize) -> Result<()> {
    let mut start = BytesStart::new(&node.name);
    for (key, value) in &node.attrs {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if node.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if let Some(text) = &node.text {
        match text {
            SvgText::Escaped(plain) => {
                writer.write_event(Event::Text(BytesText::new(plain)))?;
            }
            SvgText::Raw(markup) => {
                writer.write_event(Event::Text(BytesText::from_escaped(markup.as_str())))?;
            }
        }
    }

    if node.children.len() > PARALLEL_CHILD_THRESHOLD {
        let blocks: Vec<Vec<u8>> = node
            .children
            .par_iter()
            .map(render_subtree)
            .collect::<Result<Vec<_>>>()?;
        let inner = writer.get_mut();
        for block in &blocks {
            inner.write_all(b"\n")?;
            write_indented(inner, block, depth + 1)?;
        }
    } else {
        for child in &node.children {
            write_node(writer, child, depth + 1)?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new(&node.name)))?;
    Ok(())
}

/// Serializes one subtree standalone, at local depth zero; the caller
/// re-indents when splicing.
fn render_subtree(node: &SvgNode) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::with_capacity(256), b' ', 2);
    write_node(&mut writer, node, 0)?;
    Ok(writer.into_inner())
}

fn write_indented(out: &mut impl Write, block: &[u8], depth: usize) -> io::Result<()> {
    let indent = vec![b' '; depth * 2];
    for (index, line) in block.split(|&b| b == b'\n').enumerate() {
        if index > 0 {
            out.write_all(b"\n")?;
        }
        if !line.is_empty() {
            out.write_all(&indent)?;
            out.write_all(line)?;
        }
    }
    Ok(())
}
