// Code generated by cargo-l10n; DO NOT EDIT.
use ::core::fmt::Write as _;
use super::Localizer;
/// Localizer for the `en` language.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnLocalizer;
impl EnLocalizer {
    fn items_unread(out: &mut String, folder: &str) {
        out.push_str(" in ");
        Self::items_place(out, folder);
    }
    fn items_place(out: &mut String, folder: &str) {
        out.push_str("the ");
        out.push_str(folder);
        out.push_str(" folder");
    }
}
impl Localizer for EnLocalizer {
    fn title(&self) -> String {
        "Inbox".to_owned()
    }
    fn items(&self, count: i64, folder: &str) -> String {
        let mut out = String::new();
        match count {
            0 => {
                return "No messages".to_owned();
            }
            1 => {
                out.push_str("One message");
                Self::items_unread(&mut out, folder);
            }
            _ => {
                out.push_str(&count.to_string());
                out.push_str(" messages");
                Self::items_unread(&mut out, folder);
            }
        }
        out
    }
    fn status(&self, count: i64) -> String {
        match count {
            0 => "empty".to_owned(),
            1 => "single".to_owned(),
            _ => "several".to_owned(),
        }
    }
    fn total(&self, amount: f64, count: i64) -> String {
        let mut out = String::new();
        out.push_str("Total: ");
        write!(out, "{amount:.2}").ok();
        out.push_str(" for ");
        write!(out, "{count:>4}").ok();
        out.push_str(" items");
        out
    }
    fn greeting(&self, name: &dyn ::core::fmt::Display) -> String {
        let mut out = String::new();
        out.push_str("Hello, ");
        write!(out, "{name}").ok();
        out
    }
}
