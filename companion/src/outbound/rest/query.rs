//! PostgREST query-string builder.
//!
//! Only the operators the adapters need: column selection, `eq.` filters,
//! and ordering.

use std::fmt;

/// Sort direction for [`TableQuery::order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// A request against one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    table: &'static str,
    params: Vec<(String, String)>,
}

impl TableQuery {
    pub fn table(table: &'static str) -> Self {
        Self {
            table,
            params: Vec::new(),
        }
    }

    /// Restrict returned columns, e.g. `"*,goal_milestones(*)"`.
    #[must_use]
    pub fn select(mut self, columns: &str) -> Self {
        self.params.retain(|(key, _)| key != "select");
        self.params.push(("select".to_owned(), columns.to_owned()));
        self
    }

    /// Add a `column=eq.value` filter.
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl fmt::Display) -> Self {
        self.params.push((column.to_owned(), format!("eq.{value}")));
        self
    }

    /// Append an ordering term; later calls break ties of earlier ones.
    #[must_use]
    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        let term = format!("{column}.{}", direction.as_str());
        match self.params.iter_mut().find(|(key, _)| key == "order") {
            Some((_, value)) => {
                value.push(',');
                value.push_str(&term);
            }
            None => self.params.push(("order".to_owned(), term)),
        }
        self
    }

    pub fn table_name(&self) -> &'static str {
        self.table
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn filters_and_orders_are_encoded_in_postgrest_form() {
        let query = TableQuery::table("prompt_feedback")
            .select("*")
            .eq("prompt_id", "bp-1-role")
            .eq("prompt_type", "book")
            .order("helpful_count", Direction::Desc)
            .order("created_at", Direction::Desc);

        assert_eq!(query.table_name(), "prompt_feedback");
        assert_eq!(
            query.params(),
            [
                ("select".to_owned(), "*".to_owned()),
                ("prompt_id".to_owned(), "eq.bp-1-role".to_owned()),
                ("prompt_type".to_owned(), "eq.book".to_owned()),
                (
                    "order".to_owned(),
                    "helpful_count.desc,created_at.desc".to_owned()
                ),
            ]
        );
    }

    #[rstest]
    fn select_replaces_earlier_selection() {
        let query = TableQuery::table("chapters").select("number").select("*");
        assert_eq!(query.params(), [("select".to_owned(), "*".to_owned())]);
    }
}
