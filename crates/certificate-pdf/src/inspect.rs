//! Read back what a rendered certificate draws
//!
//! Decodes the page content stream and replays the operators this crate
//! emits, recovering every shown string with its font, size, position and
//! effective opacity, plus the straight rules drawn on the page.
//!
//! # Example
//! ```no_run
//! use certificate_pdf::inspect::inspect;
//!
//! # fn example(pdf: &[u8]) -> Result<(), certificate_pdf::CertificateError> {
//! let page = inspect(pdf)?;
//! for run in &page.text_runs {
//!     println!("{:>6.1} {:>6.1}  {}", run.x_mm, run.y_mm, run.text);
//! }
//! # Ok(())
//! # }
//! ```

use crate::error::CertificateError;
use crate::fonts::FontStyle;
use crate::text::decode_win_ansi;
use crate::units::pdf_to_layout;
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};
use serde::Serialize;
use std::collections::BTreeMap;

/// One `Tj` string as placed on the page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub text: String,
    pub font: Option<FontStyle>,
    pub size: f64,
    /// Left edge of the string, layout millimeters
    pub x_mm: f64,
    /// Baseline, layout millimeters from the top edge
    pub y_mm: f64,
    pub opacity: f64,
}

/// A stroked straight segment (`m` followed by `l`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rule {
    pub x1_mm: f64,
    pub y1_mm: f64,
    pub x2_mm: f64,
    pub y2_mm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageInspection {
    pub page_count: usize,
    pub media_box: [f64; 4],
    pub text_runs: Vec<TextRun>,
    pub rules: Vec<Rule>,
    pub operators: Vec<String>,
    pub image_count: usize,
}

impl PageInspection {
    /// All shown text, one run per line
    pub fn text(&self) -> String {
        self.text_runs
            .iter()
            .map(|run| run.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// First run whose text equals `text`
    pub fn find(&self, text: &str) -> Option<&TextRun> {
        self.text_runs.iter().find(|run| run.text == text)
    }

    /// Runs with a baseline within `tolerance` mm of `y_mm`
    pub fn runs_at(&self, y_mm: f64, tolerance: f64) -> Vec<&TextRun> {
        self.text_runs
            .iter()
            .filter(|run| (run.y_mm - y_mm).abs() <= tolerance)
            .collect()
    }

    /// Horizontal rules with `y_mm` within `tolerance`
    pub fn rules_at(&self, y_mm: f64, tolerance: f64) -> Vec<&Rule> {
        self.rules
            .iter()
            .filter(|rule| (rule.y1_mm - y_mm).abs() <= tolerance && (rule.y2_mm - y_mm).abs() <= tolerance)
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
struct ReplayState {
    font: Option<FontStyle>,
    size: f64,
    opacity: f64,
}

/// Inspect the first page of a PDF
pub fn inspect(pdf_bytes: &[u8]) -> Result<PageInspection, CertificateError> {
    let doc = Document::load_mem(pdf_bytes)?;
    let pages = doc.get_pages();
    let page_id = *pages
        .values()
        .next()
        .ok_or_else(|| CertificateError::Pdf("document has no pages".to_string()))?;

    let content = Content::decode(&doc.get_page_content(page_id)?)?;
    let alphas = ext_gstate_alphas(&doc, page_id);

    let mut state = ReplayState {
        font: None,
        size: 0.0,
        opacity: 1.0,
    };
    let mut stack = Vec::new();
    let mut position = (0.0, 0.0);
    let mut path_start: Option<(f64, f64)> = None;

    let mut text_runs = Vec::new();
    let mut rules = Vec::new();
    let mut operators = Vec::with_capacity(content.operations.len());
    let mut image_count = 0;

    for op in &content.operations {
        operators.push(op.operator.clone());
        match op.operator.as_str() {
            "q" => stack.push(state),
            "Q" => {
                if let Some(saved) = stack.pop() {
                    state = saved;
                }
            }
            "gs" => {
                if let Some(Object::Name(name)) = op.operands.first() {
                    if let Some(alpha) = alphas.get(name) {
                        state.opacity = *alpha;
                    }
                }
            }
            "Tf" => {
                if let [Object::Name(name), size] = op.operands.as_slice() {
                    state.font = FontStyle::from_resource_name(name);
                    state.size = number(size).unwrap_or(0.0);
                }
            }
            "BT" => position = (0.0, 0.0),
            "Td" => {
                if let [x, y] = op.operands.as_slice() {
                    position.0 += number(x).unwrap_or(0.0);
                    position.1 += number(y).unwrap_or(0.0);
                }
            }
            "Tj" => {
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    let (x_mm, y_mm) = pdf_to_layout(position.0, position.1);
                    text_runs.push(TextRun {
                        text: decode_win_ansi(bytes),
                        font: state.font,
                        size: state.size,
                        x_mm,
                        y_mm,
                        opacity: state.opacity,
                    });
                }
            }
            "m" => path_start = point(&op.operands),
            "l" => {
                if let (Some(start), Some(end)) = (path_start, point(&op.operands)) {
                    let (x1_mm, y1_mm) = pdf_to_layout(start.0, start.1);
                    let (x2_mm, y2_mm) = pdf_to_layout(end.0, end.1);
                    rules.push(Rule {
                        x1_mm,
                        y1_mm,
                        x2_mm,
                        y2_mm,
                    });
                }
            }
            "Do" => image_count += 1,
            _ => {}
        }
    }

    Ok(PageInspection {
        page_count: pages.len(),
        media_box: media_box(&doc, page_id),
        text_runs,
        rules,
        operators,
        image_count,
    })
}

/// Text runs of the first page, in drawing order
pub fn extract_text_runs(pdf_bytes: &[u8]) -> Result<Vec<TextRun>, CertificateError> {
    Ok(inspect(pdf_bytes)?.text_runs)
}

fn number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

fn point(operands: &[Object]) -> Option<(f64, f64)> {
    match operands {
        [x, y] => Some((number(x)?, number(y)?)),
        _ => None,
    }
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        _ => object,
    }
}

fn page_dictionary(doc: &Document, page_id: ObjectId) -> Option<&Dictionary> {
    doc.get_object(page_id).ok()?.as_dict().ok()
}

/// Fill alpha (`ca`) of every ExtGState on the page
fn ext_gstate_alphas(doc: &Document, page_id: ObjectId) -> BTreeMap<Vec<u8>, f64> {
    let mut alphas = BTreeMap::new();
    let states = page_dictionary(doc, page_id)
        .and_then(|page| page.get(b"Resources").ok())
        .and_then(|resources| resolve(doc, resources).as_dict().ok())
        .and_then(|resources| resources.get(b"ExtGState").ok())
        .and_then(|states| resolve(doc, states).as_dict().ok());

    if let Some(states) = states {
        for (name, state) in states.iter() {
            let alpha = resolve(doc, state)
                .as_dict()
                .ok()
                .and_then(|state| state.get(b"ca").ok())
                .and_then(number);
            if let Some(alpha) = alpha {
                alphas.insert(name.clone(), alpha);
            }
        }
    }
    alphas
}

fn media_box(doc: &Document, page_id: ObjectId) -> [f64; 4] {
    let values: Vec<f64> = page_dictionary(doc, page_id)
        .and_then(|page| page.get(b"MediaBox").ok())
        .and_then(|mb| resolve(doc, mb).as_array().ok())
        .map(|array| array.iter().filter_map(number).collect())
        .unwrap_or_default();

    match values.as_slice() {
        [x0, y0, x1, y1] => [*x0, *y0, *x1, *y1],
        _ => [0.0; 4],
    }
}
