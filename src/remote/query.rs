use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: &'static str,
    pub direction: Direction,
}

impl OrderBy {
    pub const fn asc(column: &'static str) -> Self {
        Self {
            column,
            direction: Direction::Asc,
        }
    }

    pub const fn desc(column: &'static str) -> Self {
        Self {
            column,
            direction: Direction::Desc,
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        };
        write!(f, "{}.{}", self.column, direction)
    }
}

/// Read request for all rows of one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    pub table: &'static str,
    pub columns: &'static str,
    pub order: &'static [OrderBy],
}

impl SelectQuery {
    /// PostgREST query string, e.g. `select=*&order=round.asc,board.asc`
    pub fn to_query_string(&self) -> String {
        let columns: String = self.columns.split_whitespace().collect();
        let mut query = format!("select={}", urlencoding::encode(&columns));
        if !self.order.is_empty() {
            let order: Vec<String> = self.order.iter().map(ToString::to_string).collect();
            query.push_str("&order=");
            query.push_str(&order.join(","));
        }
        query
    }
}

/// Every insert, update and delete on one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeFilter {
    pub schema: String,
    pub table: &'static str,
}

impl ChangeFilter {
    pub fn all(schema: impl Into<String>, table: &'static str) -> Self {
        Self {
            schema: schema.into(),
            table,
        }
    }

    pub fn topic(&self) -> String {
        format!("realtime:{}", self.table)
    }
}
