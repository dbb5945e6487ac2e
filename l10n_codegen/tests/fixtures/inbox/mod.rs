// Code generated by cargo-l10n; DO NOT EDIT.
//! Localizers generated for the `l10n` module.
mod en;
mod de;
pub use en::EnLocalizer;
pub use de::DeLocalizer;
/// Messages every supported language implements.
pub trait Localizer: ::core::any::Any + Send + Sync {
    /// Renders the `title` message.
    fn title(&self) -> String;
    /// Renders the `items` message.
    fn items(&self, count: i64, folder: &str) -> String;
    /// Renders the `status` message.
    fn status(&self, count: i64) -> String;
    /// Renders the `total` message.
    fn total(&self, amount: f64, count: i64) -> String;
    /// Renders the `greeting` message.
    fn greeting(&self, name: &dyn ::core::fmt::Display) -> String;
}
/// Identifiers of the supported languages, in registration order.
pub const SUPPORTED: &[&str] = &["en", "de"];
static REGISTRY: &[(&str, &dyn Localizer)] = &[
    ("en", &EnLocalizer as &dyn Localizer),
    ("de", &DeLocalizer as &dyn Localizer),
];
/// Returns the localizer registered for `lang`, or `None` when the
/// identifier is unknown.
#[must_use]
pub fn new(lang: &str) -> Option<&'static dyn Localizer> {
    REGISTRY.iter().find(|(id, _)| *id == lang).map(|(_, localizer)| *localizer)
}
/// Returns the language identifier of `localizer`, or `""` when it
/// is not one of the generated localizers.
#[must_use]
pub fn language(localizer: &dyn Localizer) -> &'static str {
    let any: &dyn ::core::any::Any = localizer;
    if any.is::<EnLocalizer>() {
        return "en";
    }
    if any.is::<DeLocalizer>() {
        return "de";
    }
    ""
}
