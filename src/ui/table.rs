use askama::Template;

/// HTML table with a leading 0-based row index column.
#[derive(Template)]
#[template(path = "table.html")]
pub struct DataTable<'a> {
    pub headers: &'a [String],
    pub rows: &'a [Vec<String>],
}
