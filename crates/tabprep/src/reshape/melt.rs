//! Wide-to-long reshaping.

use crate::error::{Result, TabprepError};
use crate::table::{Column, ColumnType, DataTable};

/// Melt a wide table into long format.
///
/// Every column not listed in `id_vars` is melted. For a table with
/// columns `[population, 0 min, 5 min]` and `id_vars = ["population"]`,
/// the result has columns `[population, var_name, value_name]` with one
/// row per (time column, source row), ordered by time column first.
///
/// The value column keeps the melted columns' type when they agree;
/// integer/float mixes become float and anything else becomes string.
pub fn wide_to_long(
    table: &DataTable,
    id_vars: &[&str],
    var_name: &str,
    value_name: &str,
) -> Result<DataTable> {
    for id in id_vars {
        if !table.has_column(id) {
            return Err(TabprepError::ColumnNotFound(id.to_string()));
        }
    }

    if var_name == value_name {
        return Err(TabprepError::Config(format!(
            "var_name and value_name must differ, both are '{}'",
            var_name
        )));
    }
    for name in [var_name, value_name] {
        if id_vars.contains(&name) {
            return Err(TabprepError::Config(format!(
                "'{}' is already an id column",
                name
            )));
        }
    }

    let value_columns: Vec<(&str, &Column)> = table
        .columns()
        .filter(|(name, _)| !id_vars.contains(name))
        .collect();

    let rows = table.row_count();
    let total = rows * value_columns.len();

    let mut melted = DataTable::new();

    for id in id_vars {
        let Some(source) = table.column(id) else {
            return Err(TabprepError::ColumnNotFound(id.to_string()));
        };
        let mut values = Vec::with_capacity(total);
        for _ in &value_columns {
            values.extend(source.values().iter().cloned());
        }
        melted.set_column(*id, Column::new(source.dtype(), values))?;
    }

    let mut labels = Vec::with_capacity(total);
    let mut cells = Vec::with_capacity(total);
    for (name, column) in &value_columns {
        labels.extend(std::iter::repeat_n(Some(name.to_string()), rows));
        cells.extend(column.values().iter().cloned());
    }

    melted.set_column(var_name, Column::string(labels))?;
    melted.set_column(value_name, Column::new(melted_type(&value_columns), cells))?;

    Ok(melted)
}

/// Common type of the melted columns.
fn melted_type(columns: &[(&str, &Column)]) -> ColumnType {
    let mut types = columns.iter().map(|(_, c)| c.dtype());
    let Some(first) = types.next() else {
        return ColumnType::Float;
    };

    let mut uniform = true;
    let mut promoted = first;
    for ty in types {
        uniform &= ty == first;
        promoted = promoted.promote(ty);
    }

    match promoted {
        ColumnType::Categorical if !uniform => ColumnType::String,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;

    fn wide() -> DataTable {
        DataTable::from_columns([
            ("population", Column::string([Some("A"), Some("B")])),
            ("0 min", Column::integer([Some(10), Some(20)])),
            ("5 min", Column::integer([Some(12), None])),
        ])
        .unwrap()
    }

    #[test]
    fn test_melt_orders_by_value_column() {
        let long = wide_to_long(&wide(), &["population"], "time", "pop_count").unwrap();

        assert_eq!(long.column_names(), vec!["population", "time", "pop_count"]);
        assert_eq!(long.row_count(), 4);
        assert_eq!(long.index(), &[0, 1, 2, 3]);

        let time: Vec<String> = long.column("time").unwrap().values().iter().map(|v| v.to_string()).collect();
        assert_eq!(time, vec!["0 min", "0 min", "5 min", "5 min"]);

        let count = long.column("pop_count").unwrap();
        assert_eq!(count.dtype(), ColumnType::Integer);
        assert_eq!(
            count.values(),
            &[Value::Int(10), Value::Int(20), Value::Int(12), Value::Missing]
        );
        assert_eq!(long.get(3, "population"), Some(&Value::from("B")));
    }

    #[test]
    fn test_melt_mixed_types_promote() {
        let mut table = wide();
        table
            .set_column("10 min", Column::float([Some(1.5), Some(2.5)]))
            .unwrap();
        let long = wide_to_long(&table, &["population"], "time", "value").unwrap();
        assert_eq!(long.column("value").unwrap().dtype(), ColumnType::Float);

        table
            .set_column("note", Column::string([Some("x"), Some("y")]))
            .unwrap();
        let long = wide_to_long(&table, &["population"], "time", "value").unwrap();
        assert_eq!(long.column("value").unwrap().dtype(), ColumnType::String);
    }

    #[test]
    fn test_melt_unknown_id_column() {
        let err = wide_to_long(&wide(), &["site"], "time", "value").unwrap_err();
        assert!(matches!(err, TabprepError::ColumnNotFound(name) if name == "site"));
    }

    #[test]
    fn test_melt_name_collision() {
        let err = wide_to_long(&wide(), &["population"], "population", "value").unwrap_err();
        assert!(matches!(err, TabprepError::Config(_)));
    }
}
