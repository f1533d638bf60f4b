//! WordprocessingML fragments built as strings.

use crate::config::hex_digits;
use crate::opc::escape_xml;

/// Twentieths of a point per millimetre.
const TWIPS_PER_MM: f32 = 1440.0 / 25.4;

pub fn twips_mm(mm: f32) -> u32 {
    (mm * TWIPS_PER_MM).round().max(0.0) as u32
}

pub fn twips_pt(pt: f32) -> u32 {
    (pt * 20.0).round().max(0.0) as u32
}

/// Character formatting for one run
#[derive(Debug, Default, Clone)]
pub struct RunProps<'a> {
    pub font: Option<&'a str>,
    pub bold: bool,
    pub italic: bool,
    pub color: Option<&'a str>,
    pub size: Option<f32>,
}

impl RunProps<'_> {
    fn write(&self, out: &mut String) {
        if self.font.is_none()
            && !self.bold
            && !self.italic
            && self.color.is_none()
            && self.size.is_none()
        {
            return;
        }
        out.push_str("<w:rPr>");
        if let Some(font) = self.font {
            let font = escape_xml(font);
            out.push_str(&format!(
                "<w:rFonts w:ascii=\"{font}\" w:hAnsi=\"{font}\" w:cs=\"{font}\"/>"
            ));
        }
        if self.bold {
            out.push_str("<w:b/>");
        }
        if self.italic {
            out.push_str("<w:i/>");
        }
        if let Some(color) = self.color {
            out.push_str(&format!("<w:color w:val=\"{}\"/>", hex_digits(color)));
        }
        if let Some(size) = self.size {
            // half-points
            out.push_str(&format!("<w:sz w:val=\"{}\"/>", (size * 2.0).round() as u32));
        }
        out.push_str("</w:rPr>");
    }
}

/// A text run. Newlines become line breaks inside the same paragraph.
pub fn run(text: &str, props: &RunProps) -> String {
    let mut out = String::from("<w:r>");
    props.write(&mut out);
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push_str("<w:br/>");
        }
        out.push_str(&format!(
            "<w:t xml:space=\"preserve\">{}</w:t>",
            escape_xml(line)
        ));
    }
    out.push_str("</w:r>");
    out
}

pub fn tab() -> &'static str {
    "<w:r><w:tab/></w:r>"
}

#[derive(Debug, Clone, Copy)]
pub enum Border<'a> {
    Left { color: &'a str, size: u32 },
    Bottom { color: &'a str, size: u32 },
    Box { color: &'a str, size: u32 },
}

/// Paragraph formatting. Children are written in schema order.
#[derive(Debug, Default, Clone)]
pub struct ParaProps<'a> {
    pub style: Option<&'a str>,
    pub keep_next: bool,
    pub border: Option<Border<'a>>,
    pub shading: Option<&'a str>,
    /// Space before and after, in points.
    pub before: Option<f32>,
    pub after: Option<f32>,
    /// Left indent and hanging indent, in millimetres.
    pub indent: Option<f32>,
    pub hanging: Option<f32>,
    pub align: Option<&'a str>,
}

impl ParaProps<'_> {
    fn write(&self, out: &mut String) {
        let mut props = String::new();
        if let Some(style) = self.style {
            props.push_str(&format!("<w:pStyle w:val=\"{style}\"/>"));
        }
        if self.keep_next {
            props.push_str("<w:keepNext/>");
        }
        if let Some(border) = self.border {
            props.push_str("<w:pBdr>");
            match border {
                Border::Left { color, size } => {
                    write_border(&mut props, "left", color, size);
                }
                Border::Bottom { color, size } => {
                    write_border(&mut props, "bottom", color, size);
                }
                Border::Box { color, size } => {
                    for side in ["top", "left", "bottom", "right"] {
                        write_border(&mut props, side, color, size);
                    }
                }
            }
            props.push_str("</w:pBdr>");
        }
        if let Some(fill) = self.shading {
            props.push_str(&format!(
                "<w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"{}\"/>",
                hex_digits(fill)
            ));
        }
        if self.before.is_some() || self.after.is_some() {
            props.push_str("<w:spacing");
            if let Some(before) = self.before {
                props.push_str(&format!(" w:before=\"{}\"", twips_pt(before)));
            }
            if let Some(after) = self.after {
                props.push_str(&format!(" w:after=\"{}\"", twips_pt(after)));
            }
            props.push_str("/>");
        }
        if self.indent.is_some() || self.hanging.is_some() {
            props.push_str("<w:ind");
            if let Some(left) = self.indent {
                props.push_str(&format!(" w:left=\"{}\"", twips_mm(left)));
            }
            if let Some(hanging) = self.hanging {
                props.push_str(&format!(" w:hanging=\"{}\"", twips_mm(hanging)));
            }
            props.push_str("/>");
        }
        if let Some(align) = self.align {
            props.push_str(&format!("<w:jc w:val=\"{align}\"/>"));
        }
        if !props.is_empty() {
            out.push_str(&format!("<w:pPr>{props}</w:pPr>"));
        }
    }
}

fn write_border(out: &mut String, side: &str, color: &str, size: u32) {
    out.push_str(&format!(
        "<w:{side} w:val=\"single\" w:sz=\"{size}\" w:space=\"4\" w:color=\"{}\"/>",
        hex_digits(color)
    ));
}

/// A paragraph wrapping already-built runs.
pub fn paragraph(props: &ParaProps, runs: &str) -> String {
    let mut out = String::from("<w:p>");
    props.write(&mut out);
    out.push_str(runs);
    out.push_str("</w:p>");
    out
}

pub fn page_break() -> &'static str {
    "<w:p><w:r><w:br w:type=\"page\"/></w:r></w:p>"
}

/// A complex field such as `PAGE` or `TOC ...`, split into its three parts.
pub fn field(instruction: &str, props: &RunProps) -> String {
    let mut rpr = String::new();
    props.write(&mut rpr);
    format!(
        "<w:r>{rpr}<w:fldChar w:fldCharType=\"begin\"/></w:r>\
         <w:r>{rpr}<w:instrText xml:space=\"preserve\"> {} </w:instrText></w:r>\
         <w:r>{rpr}<w:fldChar w:fldCharType=\"separate\"/></w:r>\
         <w:r>{rpr}<w:fldChar w:fldCharType=\"end\"/></w:r>",
        escape_xml(instruction)
    )
}
