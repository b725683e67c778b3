pub const BRAND: &str = "SheetMates";

/// `"<title> | SheetMates"`, unless the title already names the brand.
pub fn page_title(title: &str) -> String {
    if title.contains(BRAND) {
        title.to_string()
    } else {
        format!("{title} | {BRAND}")
    }
}
