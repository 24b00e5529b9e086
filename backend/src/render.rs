//! Letter and receipt rendering.
//!
//! Two artifact families: appointment letters (plain text or PDF) and
//! bill receipts (PDF). PDF generation uses `printpdf` with the built-in
//! Helvetica faces so no font files need shipping; output is written to
//! an in-memory buffer and returned as bytes for the HTTP layer to wrap.

use std::io::BufWriter;

use chrono::{DateTime, Utc};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use thiserror::Error as ThisError;

use crate::domain::appointment::Appointment;
use crate::domain::billing::Bill;
use crate::domain::error::Error;
use crate::domain::user::User;

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const MARGIN_LEFT: Mm = Mm(20.0);

/// Errors raised while producing a rendered artifact.
#[derive(Debug, ThisError)]
pub enum RenderError {
    /// A built-in font failed to register with the document.
    #[error("font registration failed: {0}")]
    Font(String),
    /// The document could not be serialised.
    #[error("document serialisation failed: {0}")]
    Save(String),
    /// The output buffer could not be recovered after writing.
    #[error("output buffer unavailable: {0}")]
    Buffer(String),
}

impl From<RenderError> for Error {
    fn from(err: RenderError) -> Self {
        Self::internal(err.to_string())
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Compose the plain-text confirmation letter for an appointment.
pub fn appointment_letter_text(appointment: &Appointment, patient: &User, doctor: &User) -> String {
    let mut letter = String::new();
    letter.push_str("APPOINTMENT CONFIRMATION\n");
    letter.push_str("========================\n\n");
    letter.push_str(&format!("Reference: {}\n\n", appointment.id));
    letter.push_str(&format!("Dear {},\n\n", patient.name));
    letter.push_str(&format!(
        "This letter confirms your appointment with {} on {}.\n\n",
        doctor.name,
        format_timestamp(appointment.scheduled_time)
    ));
    letter.push_str(&format!("Current status: {}\n\n", appointment.status));
    letter.push_str("Please arrive ten minutes early and bring this letter with you.\n");
    letter
}

/// Render the appointment confirmation letter as a PDF document.
pub fn appointment_letter_pdf(
    appointment: &Appointment,
    patient: &User,
    doctor: &User,
) -> Result<Vec<u8>, RenderError> {
    let (doc, page, layer) = PdfDocument::new(
        "Appointment Confirmation",
        PAGE_WIDTH,
        PAGE_HEIGHT,
        "Layer 1",
    );
    let layer = doc.get_page(page).get_layer(layer);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Font(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError::Font(e.to_string()))?;

    let mut y = Mm(270.0);
    layer.use_text("APPOINTMENT CONFIRMATION", 14.0, MARGIN_LEFT, y, &bold);
    y -= Mm(12.0);
    layer.use_text(
        format!("Reference: {}", appointment.id),
        9.0,
        MARGIN_LEFT,
        y,
        &font,
    );
    y -= Mm(10.0);
    layer.use_text(format!("Dear {},", patient.name), 11.0, MARGIN_LEFT, y, &font);
    y -= Mm(8.0);
    let body = format!(
        "This letter confirms your appointment with {} on {}.",
        doctor.name,
        format_timestamp(appointment.scheduled_time)
    );
    for line in wrap_text(&body, 80) {
        layer.use_text(&line, 11.0, MARGIN_LEFT, y, &font);
        y -= Mm(6.0);
    }
    y -= Mm(4.0);
    layer.use_text(
        format!("Current status: {}", appointment.status),
        11.0,
        MARGIN_LEFT,
        y,
        &font,
    );
    y -= Mm(10.0);
    layer.use_text(
        "Please arrive ten minutes early and bring this letter with you.",
        10.0,
        MARGIN_LEFT,
        y,
        &font,
    );

    save_document(doc)
}

/// Render a bill receipt as a PDF document.
pub fn bill_receipt_pdf(bill: &Bill, patient: &User, doctor: &User) -> Result<Vec<u8>, RenderError> {
    let (doc, page, layer) = PdfDocument::new("Bill Receipt", PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
    let layer = doc.get_page(page).get_layer(layer);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Font(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError::Font(e.to_string()))?;
    let courier = doc
        .add_builtin_font(BuiltinFont::Courier)
        .map_err(|e| RenderError::Font(e.to_string()))?;

    let mut y = Mm(270.0);
    layer.use_text("BILL RECEIPT", 14.0, MARGIN_LEFT, y, &bold);
    y -= Mm(8.0);
    layer.use_text(format!("Reference: {}", bill.id), 9.0, MARGIN_LEFT, y, &font);
    y -= Mm(6.0);
    layer.use_text(
        format!("Issued: {}", format_timestamp(bill.created_at)),
        9.0,
        MARGIN_LEFT,
        y,
        &font,
    );
    y -= Mm(10.0);
    layer.use_text(format!("Patient: {}", patient.name), 11.0, MARGIN_LEFT, y, &font);
    y -= Mm(6.0);
    layer.use_text(format!("Doctor: {}", doctor.name), 11.0, MARGIN_LEFT, y, &font);
    y -= Mm(12.0);

    layer.use_text("CHARGES:", 11.0, MARGIN_LEFT, y, &bold);
    y -= Mm(6.0);
    let rows = [
        format!("  Consultation fees    {:>10.2}", bill.fees),
        format!("  Medicines            {:>10.2}", bill.medicines_cost),
        format!("  Total                {:>10.2}", bill.total),
    ];
    for row in &rows {
        layer.use_text(row, 10.0, Mm(25.0), y, &courier);
        y -= Mm(5.0);
    }
    y -= Mm(8.0);

    let settlement = match bill.paid_at {
        Some(paid_at) => format!("PAID on {}", format_timestamp(paid_at)),
        None => "UNPAID".to_owned(),
    };
    layer.use_text(format!("Status: {settlement}"), 11.0, MARGIN_LEFT, y, &bold);

    save_document(doc)
}

fn save_document(doc: printpdf::PdfDocumentReference) -> Result<Vec<u8>, RenderError> {
    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| RenderError::Save(e.to_string()))?;
    buf.into_inner()
        .map_err(|e| RenderError::Buffer(e.to_string()))
}

/// Word-wrap on whitespace; never splits a single long word.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + word.len() + 1 > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
