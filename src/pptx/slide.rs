//! PresentationML slides built from positioned rectangles and text boxes.

use crate::config::hex_digits;
use crate::opc::escape_xml;

const EMU_PER_INCH: f32 = 914_400.0;

/// English Metric Units for a length in inches.
pub fn emu(inches: f32) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

/// Position and size in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Frame {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    fn write(&self, out: &mut String) {
        out.push_str(&format!(
            "<a:xfrm><a:off x=\"{}\" y=\"{}\"/><a:ext cx=\"{}\" cy=\"{}\"/></a:xfrm>",
            emu(self.left),
            emu(self.top),
            emu(self.width),
            emu(self.height)
        ));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    fn attr(self) -> &'static str {
        match self {
            Align::Left => "l",
            Align::Center => "ctr",
            Align::Right => "r",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle<'a> {
    pub font: &'a str,
    /// Points.
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    pub color: &'a str,
    pub align: Align,
}

impl<'a> TextStyle<'a> {
    pub fn new(font: &'a str, size: f32, color: &'a str) -> Self {
        Self {
            font,
            size,
            bold: false,
            italic: false,
            color,
            align: Align::Left,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Rect { frame: Frame, fill: String },
    Text { frame: Frame, paragraphs: String },
}

/// One slide: a solid background and shapes in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    background: String,
    shapes: Vec<Shape>,
}

impl Slide {
    pub fn new(background: &str) -> Self {
        Self {
            background: background.to_string(),
            shapes: Vec::new(),
        }
    }

    /// A borderless filled rectangle, used for bars, rules and cards.
    pub fn rect(&mut self, frame: Frame, fill: &str) {
        self.shapes.push(Shape::Rect {
            frame,
            fill: fill.to_string(),
        });
    }

    /// A text box with one paragraph per line of `text`.
    pub fn text(&mut self, frame: Frame, text: &str, style: &TextStyle) {
        let mut paragraphs = String::new();
        for line in text.split('\n') {
            paragraph(&mut paragraphs, line, style);
        }
        self.shapes.push(Shape::Text { frame, paragraphs });
    }

    /// A text box with a heading paragraph followed by bullet lines.
    pub fn bullets(
        &mut self,
        frame: Frame,
        title: &str,
        items: &[String],
        title_style: &TextStyle,
        item_style: &TextStyle,
    ) {
        let mut paragraphs = String::new();
        paragraph(&mut paragraphs, title, title_style);
        for item in items {
            paragraph(&mut paragraphs, &format!("  •  {item}"), item_style);
        }
        self.shapes.push(Shape::Text { frame, paragraphs });
    }

    /// Every text run on the slide, in paint order.
    pub fn texts(&self) -> Vec<String> {
        let mut texts = Vec::new();
        for shape in &self.shapes {
            if let Shape::Text { paragraphs, .. } = shape {
                for chunk in paragraphs.split("<a:t>").skip(1) {
                    if let Some((text, _)) = chunk.split_once("</a:t>") {
                        texts.push(text.to_string());
                    }
                }
            }
        }
        texts
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
             <p:sld xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
             xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
             xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\">",
        );
        out.push_str(&format!(
            "<p:cSld><p:bg><p:bgPr><a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill>\
             <a:effectLst/></p:bgPr></p:bg><p:spTree>",
            hex_digits(&self.background)
        ));
        out.push_str(
            "<p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
             <p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/>\
             <a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr>",
        );

        // Shape ids start after the group at id 1
        for (i, shape) in self.shapes.iter().enumerate() {
            let id = i + 2;
            match shape {
                Shape::Rect { frame, fill } => {
                    out.push_str(&format!(
                        "<p:sp><p:nvSpPr><p:cNvPr id=\"{id}\" name=\"Rectangle {id}\"/>\
                         <p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr>"
                    ));
                    frame.write(&mut out);
                    out.push_str(&format!(
                        "<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom>\
                         <a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill>\
                         <a:ln><a:noFill/></a:ln></p:spPr></p:sp>",
                        hex_digits(fill)
                    ));
                }
                Shape::Text { frame, paragraphs } => {
                    out.push_str(&format!(
                        "<p:sp><p:nvSpPr><p:cNvPr id=\"{id}\" name=\"TextBox {id}\"/>\
                         <p:cNvSpPr txBox=\"1\"/><p:nvPr/></p:nvSpPr><p:spPr>"
                    ));
                    frame.write(&mut out);
                    out.push_str(
                        "<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>\
                         <p:txBody><a:bodyPr wrap=\"square\" rtlCol=\"0\"><a:normAutofit/></a:bodyPr>\
                         <a:lstStyle/>",
                    );
                    out.push_str(paragraphs);
                    out.push_str("</p:txBody></p:sp>");
                }
            }
        }

        out.push_str(
            "</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>",
        );
        out
    }
}

fn paragraph(out: &mut String, text: &str, style: &TextStyle) {
    // hundredths of a point
    let size = (style.size * 100.0).round() as u32;
    let font = escape_xml(style.font);
    out.push_str(&format!(
        "<a:p><a:pPr algn=\"{}\"/><a:r><a:rPr lang=\"en-US\" sz=\"{size}\" b=\"{}\" i=\"{}\" dirty=\"0\">\
         <a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill>\
         <a:latin typeface=\"{font}\"/><a:cs typeface=\"{font}\"/></a:rPr><a:t>{}</a:t></a:r></a:p>",
        style.align.attr(),
        u8::from(style.bold),
        u8::from(style.italic),
        hex_digits(style.color),
        escape_xml(text)
    ));
}
