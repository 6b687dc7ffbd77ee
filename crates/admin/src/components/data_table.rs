//! Data table component types.
//!
//! These types define the column layout of the users table and build the
//! sort links rendered in its header.

use roster_core::listing::{SortDirection, SortField, SortState};

/// Column definition for a data table.
#[derive(Debug, Clone)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: String,
    /// Display label for the column header.
    pub label: String,
    /// Field this column sorts by, if sortable.
    pub sort_field: Option<SortField>,
}

impl TableColumn {
    /// Create a new sortable column keyed by its sort field.
    #[must_use]
    pub fn sortable(field: SortField, label: &str) -> Self {
        Self {
            key: field.as_param().to_string(),
            label: label.to_string(),
            sort_field: Some(field),
        }
    }

    /// Create a new non-sortable column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            sort_field: None,
        }
    }
}

/// A column header as rendered for the current sort state.
#[derive(Debug, Clone)]
pub struct ColumnHeader {
    pub key: String,
    pub label: String,
    /// Link that applies the toggled sort; `None` for static columns.
    pub href: Option<String>,
    /// Arrow shown next to the active column.
    pub indicator: &'static str,
    /// Value for the `aria-sort` attribute.
    pub aria_sort: &'static str,
}

/// Configuration for a data table.
#[derive(Debug, Clone)]
pub struct DataTableConfig {
    /// Unique table identifier.
    pub table_id: String,
    /// Column definitions.
    pub columns: Vec<TableColumn>,
    /// Title for empty state.
    pub empty_title: String,
    /// Description for empty state.
    pub empty_description: Option<String>,
}

impl DataTableConfig {
    /// Create a new data table configuration.
    #[must_use]
    pub fn new(table_id: &str) -> Self {
        Self {
            table_id: table_id.to_string(),
            columns: vec![],
            empty_title: "No items found".to_string(),
            empty_description: None,
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Set empty state configuration.
    #[must_use]
    pub fn empty_state(mut self, title: &str, description: Option<&str>) -> Self {
        self.empty_title = title.to_string();
        self.empty_description = description.map(ToString::to_string);
        self
    }

    /// Headers for the given sort state. Each sortable header links to the
    /// state produced by toggling its field, starting from page 1.
    #[must_use]
    pub fn headers(&self, sort: SortState) -> Vec<ColumnHeader> {
        self.columns
            .iter()
            .map(|column| {
                let active = column.sort_field.and_then(|field| sort.direction_for(field));
                let (indicator, aria_sort) = match active {
                    Some(SortDirection::Asc) => ("▲", "ascending"),
                    Some(SortDirection::Desc) => ("▼", "descending"),
                    None => ("", "none"),
                };

                ColumnHeader {
                    key: column.key.clone(),
                    label: column.label.clone(),
                    href: column
                        .sort_field
                        .map(|field| list_url(sort.toggle(field), 1)),
                    indicator,
                    aria_sort,
                }
            })
            .collect()
    }
}

/// URL of the users list for a sort state and page.
#[must_use]
pub fn list_url(sort: SortState, page: usize) -> String {
    format!("/?{}", list_params(sort, page))
}

/// Query string (without `?`) for a sort state and page.
#[must_use]
pub fn list_params(sort: SortState, page: usize) -> String {
    format!(
        "sort={}&dir={}&page={page}",
        sort.field.as_param(),
        sort.direction.as_param()
    )
}

/// Build the users table configuration.
#[must_use]
pub fn users_table_config() -> DataTableConfig {
    DataTableConfig::new("users")
        .column(TableColumn::sortable(SortField::Id, "ID"))
        .column(TableColumn::sortable(SortField::FirstName, "First name"))
        .column(TableColumn::sortable(SortField::LastName, "Last name"))
        .column(TableColumn::sortable(SortField::Email, "Email"))
        .column(TableColumn::new("skills", "Skills"))
        .column(TableColumn::sortable(
            SortField::RegistrationDate,
            "Registered",
        ))
        .column(TableColumn::new("actions", "Actions"))
        .empty_state("No users found", Some("Create the first user to get started"))
}
