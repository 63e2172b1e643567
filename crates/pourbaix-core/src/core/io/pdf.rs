use super::traits::{DiagramArtifact, DiagramFile, DiagramIoError};
use crate::core::thermo::diagram::DomainLimits;
use crate::core::thermo::pourbaix_entry::PourbaixEntry;
use nalgebra::Point2;
use std::fmt::Write as _;
use std::io::Write;
use tracing::warn;

const PAGE_WIDTH: f64 = 828.0;
const PAGE_HEIGHT: f64 = 648.0;
const PLOT_LEFT: f64 = 96.0;
const PLOT_BOTTOM: f64 = 72.0;
const PLOT_WIDTH: f64 = 684.0;
const PLOT_HEIGHT: f64 = 504.0;

const PH_TICK_STEP: f64 = 2.0;
const POTENTIAL_TICK_STEP: f64 = 0.5;
const TICK_LENGTH: f64 = 6.0;
const TICK_FONT_SIZE: f64 = 14.0;
const AXIS_FONT_SIZE: f64 = 20.0;
const LABEL_FONT_SIZE: f64 = 12.0;
const TITLE_FONT_SIZE: f64 = 18.0;

const FALLBACK_COLOR_VALUE: f64 = 0.5;
const SOLID_GRAY: f64 = 0.85;

/// Single-page PDF rendering of a diagram's stable regions.
///
/// The candidate compound is filled with the lightest "Blues" shade, ions
/// with their "rainbow" colormap position, and any other solid in gray.
pub struct PdfPlot;

impl DiagramFile for PdfPlot {
    type Error = DiagramIoError;
    const EXTENSION: &'static str = "pdf";

    fn write_to(artifact: &DiagramArtifact, writer: &mut impl Write) -> Result<(), Self::Error> {
        let content = page_content(artifact);
        writer.write_all(&assemble_document(&content))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Rgb(pub f64, pub f64, pub f64);

/// First sample of matplotlib's "Blues" colormap.
pub(crate) fn blues_lightest() -> Rgb {
    Rgb(0.9686, 0.9843, 1.0)
}

/// The "rainbow" colormap: `r = |2x - 0.5|`, `g = sin(πx)`, `b = cos(πx/2)`.
pub(crate) fn rainbow(x: f64) -> Rgb {
    let x = x.clamp(0.0, 1.0);
    let channel = |v: f64| v.clamp(0.0, 1.0);
    Rgb(
        channel((2.0 * x - 0.5).abs()),
        channel((std::f64::consts::PI * x).sin()),
        channel((std::f64::consts::FRAC_PI_2 * x).cos()),
    )
}

fn region_color(artifact: &DiagramArtifact, entry: &PourbaixEntry, is_highlight: bool) -> Rgb {
    if is_highlight {
        return blues_lightest();
    }
    if !entry.is_ion() {
        return Rgb(SOLID_GRAY, SOLID_GRAY, SOLID_GRAY);
    }
    let value = artifact
        .colors
        .get(&entry.name)
        .or_else(|| artifact.colors.get(&entry.reduced_formula()))
        .copied()
        .unwrap_or_else(|| {
            warn!(ion = %entry.name, "No plot color recorded; using the colormap midpoint.");
            FALLBACK_COLOR_VALUE
        });
    rainbow(value)
}

struct Frame {
    limits: DomainLimits,
}

impl Frame {
    fn to_page(&self, point: &Point2<f64>) -> (f64, f64) {
        let (ph_min, ph_max) = self.limits.ph;
        let (pot_min, pot_max) = self.limits.potential;
        (
            PLOT_LEFT + (point.x - ph_min) / (ph_max - ph_min) * PLOT_WIDTH,
            PLOT_BOTTOM + (point.y - pot_min) / (pot_max - pot_min) * PLOT_HEIGHT,
        )
    }
}

fn page_content(artifact: &DiagramArtifact) -> String {
    let diagram = artifact.diagram;
    let frame = Frame {
        limits: diagram.limits(),
    };
    let mut out = String::new();

    out.push_str("0.5 w 0 0 0 RG\n");
    for region in diagram.stable_regions() {
        let Some(entry) = diagram.entry(region.key) else {
            continue;
        };
        let Rgb(r, g, b) = region_color(artifact, entry, artifact.highlight == Some(region.key));
        let _ = writeln!(out, "{:.4} {:.4} {:.4} rg", r, g, b);
        for (i, vertex) in region.vertices.iter().enumerate() {
            let (x, y) = frame.to_page(vertex);
            let op = if i == 0 { "m" } else { "l" };
            let _ = writeln!(out, "{:.2} {:.2} {}", x, y, op);
        }
        out.push_str("b\n");
    }

    let _ = writeln!(
        out,
        "1.5 w {:.2} {:.2} {:.2} {:.2} re S",
        PLOT_LEFT, PLOT_BOTTOM, PLOT_WIDTH, PLOT_HEIGHT
    );
    draw_ticks(&mut out, &frame);
    draw_axis_titles(&mut out);

    out.push_str("0 0 0 rg\n");
    for region in diagram.stable_regions() {
        let (Some(entry), Some(center)) = (diagram.entry(region.key), region.centroid()) else {
            continue;
        };
        let (x, y) = frame.to_page(&center);
        text_centered(&mut out, &entry.name, LABEL_FONT_SIZE, x, y - LABEL_FONT_SIZE / 3.0);
    }

    let metastability = diagram.metastability();
    if metastability != 0.0 {
        let title = format!("Metastable Tolerance = {} meV/atom", metastability);
        text_centered(
            &mut out,
            &title,
            TITLE_FONT_SIZE,
            PLOT_LEFT + PLOT_WIDTH / 2.0,
            PLOT_BOTTOM + PLOT_HEIGHT + 24.0,
        );
    }
    out
}

fn draw_ticks(out: &mut String, frame: &Frame) {
    let (ph_min, ph_max) = frame.limits.ph;
    for value in tick_values(ph_min, ph_max, PH_TICK_STEP) {
        let (x, y) = frame.to_page(&Point2::new(value, frame.limits.potential.0));
        let _ = writeln!(out, "1 w {:.2} {:.2} m {:.2} {:.2} l S", x, y, x, y - TICK_LENGTH);
        text_centered(out, &format!("{}", value), TICK_FONT_SIZE, x, y - TICK_LENGTH - TICK_FONT_SIZE - 2.0);
    }

    let (pot_min, pot_max) = frame.limits.potential;
    for value in tick_values(pot_min, pot_max, POTENTIAL_TICK_STEP) {
        let (x, y) = frame.to_page(&Point2::new(frame.limits.ph.0, value));
        let _ = writeln!(out, "1 w {:.2} {:.2} m {:.2} {:.2} l S", x, y, x - TICK_LENGTH, y);
        let label = format!("{:.1}", value);
        let width = text_width(&label, TICK_FONT_SIZE);
        text_at(out, &label, TICK_FONT_SIZE, x - TICK_LENGTH - 4.0 - width, y - TICK_FONT_SIZE / 3.0);
    }
}

fn draw_axis_titles(out: &mut String) {
    text_centered(out, "pH", AXIS_FONT_SIZE, PLOT_LEFT + PLOT_WIDTH / 2.0, PLOT_BOTTOM - 52.0);

    let label = "E (V)";
    let x = PLOT_LEFT - 58.0;
    let y = PLOT_BOTTOM + PLOT_HEIGHT / 2.0 - text_width(label, AXIS_FONT_SIZE) / 2.0;
    let _ = writeln!(
        out,
        "BT /F1 {} Tf 0 1 -1 0 {:.2} {:.2} Tm ({}) Tj ET",
        AXIS_FONT_SIZE,
        x,
        y,
        escape_text(label)
    );
}

fn tick_values(min: f64, max: f64, step: f64) -> Vec<f64> {
    let first = (min / step).ceil() as i64;
    let last = (max / step + 1e-9).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

// Helvetica averages a little over half an em per glyph.
fn text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * 0.55
}

fn text_at(out: &mut String, text: &str, size: f64, x: f64, y: f64) {
    let _ = writeln!(
        out,
        "BT /F1 {} Tf {:.2} {:.2} Td ({}) Tj ET",
        size,
        x,
        y,
        escape_text(text)
    );
}

fn text_centered(out: &mut String, text: &str, size: f64, x: f64, y: f64) {
    text_at(out, text, size, x - text_width(text, size) / 2.0, y);
}

pub(crate) fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '(' | ')' => {
                escaped.push('\\');
                escaped.push(c);
            }
            c if c.is_ascii() && !c.is_ascii_control() => escaped.push(c),
            _ => escaped.push('?'),
        }
    }
    escaped
}

fn assemble_document(content: &str) -> Vec<u8> {
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] /Contents 4 0 R \
             /Resources << /Font << /F1 5 0 R >> >> >>",
            PAGE_WIDTH, PAGE_HEIGHT
        ),
        format!(
            "<< /Length {} >>\nstream\n{}endstream",
            content.len(),
            content
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];

    let mut buffer: Vec<u8> = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(buffer.len());
        buffer.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref_offset = buffer.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        let _ = write!(xref, "{:010} 00000 n \n", offset);
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    );
    buffer.extend_from_slice(xref.as_bytes());
    buffer
}
