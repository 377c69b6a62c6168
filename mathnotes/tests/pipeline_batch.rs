use mathnotes::{
    normalize_recognized, MathError, MathResult, Pipeline, Recognizer, ResultRecord,
};
use std::path::Path;

struct StubRecognizer(String);

impl Recognizer for StubRecognizer {
    fn recognize(&self, _image: &Path) -> MathResult<String> {
        Ok(self.0.clone())
    }
}

struct FailingRecognizer;

impl Recognizer for FailingRecognizer {
    fn recognize(&self, _image: &Path) -> MathResult<String> {
        Err(MathError::Recognize("no text detected".to_string()))
    }
}

#[test]
fn batch_produces_one_record_per_line_in_input_order() {
    let pipeline = Pipeline::new();
    let records = pipeline.process_batch("x + 1 = 2\n\\int x^2 dx\n2x \\cdot 3");
    assert_eq!(records.len(), 3);
    assert!(matches!(records[0], ResultRecord::Equation { .. }));
    assert!(matches!(records[1], ResultRecord::Integration { .. }));
    assert!(matches!(records[2], ResultRecord::Expression { .. }));
    assert_eq!(records[0].latex(), "x + 1 = 2");
    assert_eq!(records[2].latex(), "2x \\cdot 3");
}

#[test]
fn blank_lines_contribute_nothing() {
    let pipeline = Pipeline::new();
    let records = pipeline.process_batch("\n\n  x  \n\n\t\n");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].latex(), "x");
}

#[test]
fn empty_batch_is_empty() {
    let pipeline = Pipeline::new();
    assert!(pipeline.process_batch("").is_empty());
    assert!(pipeline.process_batch("\n\n").is_empty());
}

#[test]
fn a_bad_line_never_sinks_the_batch() {
    let pipeline = Pipeline::new();
    let records = pipeline.process_batch("x + 1 = 2\n\\badcmd{\n\\int x^2 dx");
    assert_eq!(records.len(), 3);
    assert!(!records[0].is_error());
    assert!(records[1].is_error());
    assert!(!records[2].is_error());
}

#[test]
fn image_processing_goes_through_the_recognizer() {
    let pipeline = Pipeline::new();
    let recognizer = StubRecognizer("x + 1 = 2\n2 + 2 = 4".to_string());
    let records = pipeline
        .process_image(&recognizer, Path::new("unused.png"))
        .unwrap();
    assert_eq!(records.len(), 2);
    assert!(matches!(records[0], ResultRecord::Equation { .. }));
    assert!(matches!(
        records[1],
        ResultRecord::EquationWithoutVariables { .. }
    ));
}

#[test]
fn recognition_failure_is_batch_fatal() {
    let pipeline = Pipeline::new();
    let err = pipeline
        .process_image(&FailingRecognizer, Path::new("unused.png"))
        .unwrap_err();
    assert_eq!(err.to_string(), "Recognition error: no text detected");
}

#[test]
fn recognized_markup_is_normalized() {
    assert_eq!(normalize_recognized("$x + 1$\n"), "x + 1");
    assert_eq!(normalize_recognized("  2x  "), "2x");
}

#[test]
fn dollar_free_text_is_untouched() {
    assert_eq!(normalize_recognized("x + 1"), "x + 1");
}
