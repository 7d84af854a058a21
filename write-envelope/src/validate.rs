//! The pre-serialization validation pass

use std::fmt::Display;

/// Pre-serialization validation of envelope objects.
///
/// A handful of requirements are awkward to encode in the type system, such
/// as counts having to fit their u32 wire fields or a mesh coordinate array
/// having to hold complete x/y pairs. These are enforced via a validation
/// pass before any bytes are written.
pub trait Validate {
    /// Ensure that this object is well-formed, reporting any errors.
    fn validate(&self) -> Result<(), ValidationReport> {
        let mut ctx = ValidationCtx::default();
        self.validate_impl(&mut ctx);
        if ctx.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationReport { errors: ctx.errors })
        }
    }

    /// Validate this object, reporting errors into the context.
    fn validate_impl(&self, ctx: &mut ValidationCtx);
}

/// A context for collecting validation errors.
///
/// This is responsible for tracking the position in the object tree at which
/// a given error is reported, via [`in_record`][Self::in_record],
/// [`in_field`][Self::in_field] and [`in_array_item`][Self::in_array_item].
#[derive(Clone, Debug, Default)]
pub struct ValidationCtx {
    cur_location: Vec<LocationElem>,
    errors: Vec<ValidationError>,
}

#[derive(Debug, Clone)]
struct ValidationError {
    error: String,
    location: Vec<LocationElem>,
}

/// One or more validation errors.
#[derive(Debug)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

#[derive(Debug, Clone)]
enum LocationElem {
    Record(&'static str),
    Field(&'static str),
    Index(usize),
}

impl ValidationCtx {
    fn with_elem(&mut self, elem: LocationElem, f: impl FnOnce(&mut ValidationCtx)) {
        self.cur_location.push(elem);
        f(self);
        self.cur_location.pop();
    }

    /// Run the provided closure in the context of a new record.
    pub fn in_record(&mut self, name: &'static str, f: impl FnOnce(&mut ValidationCtx)) {
        self.with_elem(LocationElem::Record(name), f);
    }

    /// Run the provided closure in the context of a new field.
    pub fn in_field(&mut self, name: &'static str, f: impl FnOnce(&mut ValidationCtx)) {
        self.with_elem(LocationElem::Field(name), f);
    }

    /// Run the provided closure in the context of the `idx`th array item.
    pub fn in_array_item(&mut self, idx: usize, f: impl FnOnce(&mut ValidationCtx)) {
        self.with_elem(LocationElem::Index(idx), f);
    }

    /// Report an error at the current location.
    pub fn report(&mut self, error: impl Into<String>) {
        self.errors.push(ValidationError {
            error: error.into(),
            location: self.cur_location.clone(),
        });
    }

    /// Report an error if a length does not fit its u32 wire field.
    pub fn check_u32_len(&mut self, name: &'static str, len: usize) {
        if len > u32::MAX as usize {
            self.in_field(name, |ctx| ctx.report("length does not fit a u32"));
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, elem) in self.location.iter().enumerate() {
            match elem {
                LocationElem::Record(name) => {
                    if i != 0 {
                        write!(f, ": ")?;
                    }
                    write!(f, "{name}")?;
                }
                LocationElem::Field(name) => write!(f, ".{name}")?,
                LocationElem::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        write!(f, ": {}", self.error)
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} validation errors:", self.errors.len())?;
        for error in &self.errors {
            writeln!(f, "  {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Nothing;

    impl Validate for Nothing {
        fn validate_impl(&self, ctx: &mut ValidationCtx) {
            ctx.in_record("Nothing", |ctx| {
                ctx.in_field("void", |ctx| ctx.report("is empty"));
            });
        }
    }

    #[test]
    fn error_paths() {
        let report = Nothing.validate().unwrap_err();
        assert!(report.to_string().contains("Nothing.void: is empty"));
    }
}
