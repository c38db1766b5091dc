//! Begin/complete logging around a unit of work
//!
//! - `{name}_BEGIN` on creation
//! - `{name}_COMPLETE` on `complete()`
//! - `{name}_FAILED` on `fail()`
//! - `{name}_INCOMPLETE` if dropped without either
//!
//! Every line carries the scope's fields plus `elapsed_us` on exit.

use std::time::Instant;

use super::logger::Logger;

/// A scope that logs its own start and end
///
/// ```ignore
/// let scope = ObservationScope::with_fields("MAPPING_BUILD", &[("field_map_id", "hosts")]);
/// let tree = builder.build(&fields)?;
/// scope.complete_with_fields(&[("fields", "12")]);
/// ```
pub struct ObservationScope<'a> {
    name: &'a str,
    finished: bool,
    fields: Vec<(&'a str, String)>,
    started: Instant,
}

impl<'a> ObservationScope<'a> {
    pub fn new(name: &'a str) -> Self {
        Self::with_fields(name, &[])
    }

    pub fn with_fields(name: &'a str, fields: &[(&'a str, &str)]) -> Self {
        Logger::info(&format!("{}_BEGIN", name), fields);

        Self {
            name,
            finished: false,
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            started: Instant::now(),
        }
    }

    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    /// Logs `{name}_COMPLETE` with extra result fields
    pub fn complete_with_fields(mut self, extra: &[(&str, &str)]) {
        self.finished = true;
        let elapsed = self.elapsed_us();
        let mut fields = self.field_refs();
        fields.extend(extra.iter().copied());
        fields.push(("elapsed_us", elapsed.as_str()));

        Logger::info(&format!("{}_COMPLETE", self.name), &fields);
    }

    /// Logs `{name}_FAILED` at ERROR level
    pub fn fail(mut self, reason: &str) {
        self.finished = true;
        let elapsed = self.elapsed_us();
        let mut fields = self.field_refs();
        fields.push(("reason", reason));
        fields.push(("elapsed_us", elapsed.as_str()));

        Logger::error(&format!("{}_FAILED", self.name), &fields);
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn field_refs(&self) -> Vec<(&str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect()
    }

    fn elapsed_us(&self) -> String {
        self.started.elapsed().as_micros().to_string()
    }
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let mut fields = self.field_refs();
            fields.push(("reason", "scope dropped without completion"));
            Logger::warn(&format!("{}_INCOMPLETE", self.name), &fields);
        }
    }
}
