//! SQL filter builder
//!
//! Builds parameterized SQL WHERE clauses from filter trees. Every literal
//! becomes a `?` placeholder; parameters are collected in the order their
//! placeholders appear in the clause text.

use serde::Serialize;
use serde_json::Value;

use super::columns::ColumnResolver;
use super::literal::{EncodedLiteral, encode_literal};
use super::operators::{ColumnOp, LogicalOp, Rendering};
use super::parser::parse_filter;
use super::types::{Condition, FilterClause, FilterNode, SqlParams};
use crate::core::config::FilterConfig;
use crate::core::constants::MAX_FILTER_DEPTH;
use crate::data::error::FilterError;
use crate::data::sql::{LiteralCast, SqlDialect};
use crate::utils::sql::count_placeholders;

/// Compiled WHERE clause with its positional parameters
///
/// `sql` is empty when there is no filter, otherwise it starts with `WHERE `.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WhereClause {
    pub sql: String,
    pub params: Vec<String>,
}

impl WhereClause {
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    pub fn placeholder_count(&self) -> usize {
        count_placeholders(&self.sql)
    }

    /// Append this clause to a base statement such as `SELECT ... FROM docs`
    pub fn append_to(&self, base_sql: &str) -> String {
        if self.is_empty() {
            base_sql.to_string()
        } else {
            format!("{} {}", base_sql.trim_end(), self.sql)
        }
    }

    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.sql, self.params)
    }
}

/// Compiles filter expressions against a fixed column layout
///
/// The builder holds only immutable configuration and can be shared across
/// threads.
#[derive(Debug, Clone)]
pub struct WhereClauseBuilder {
    config: FilterConfig,
    columns: ColumnResolver,
}

impl WhereClauseBuilder {
    pub fn new(config: FilterConfig) -> Result<Self, FilterError> {
        config.validate()?;
        let columns = ColumnResolver::new(&config);
        Ok(Self { config, columns })
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    fn dialect(&self) -> &'static dyn SqlDialect {
        self.config.backend.dialect()
    }

    /// Build a WHERE clause; an absent or empty filter yields an empty clause
    pub fn build(&self, filter: Option<&FilterNode>) -> Result<WhereClause, FilterError> {
        let Some(filter) = filter.filter(|f| !f.is_empty()) else {
            return Ok(WhereClause::default());
        };

        let mut params = SqlParams::default();
        let sql = self.walk(filter, 0, &mut params)?;

        let placeholders = count_placeholders(&sql);
        if placeholders != params.len() {
            return Err(FilterError::internal(format!(
                "clause has {} placeholder(s) but {} parameter(s): {}",
                placeholders,
                params.len(),
                sql
            )));
        }

        tracing::debug!(
            backend = %self.config.backend,
            params = params.len(),
            clause = %sql,
            "Compiled filter"
        );

        Ok(WhereClause {
            sql: format!("WHERE {}", sql),
            params: params.values,
        })
    }

    /// Build from a JSON value; `None` and `null` mean no filter
    pub fn build_value(&self, filter: Option<&Value>) -> Result<WhereClause, FilterError> {
        match filter {
            None | Some(Value::Null) => Ok(WhereClause::default()),
            Some(value) => {
                let node = FilterNode::from_value(value)?;
                self.build(Some(&node))
            }
        }
    }

    /// Build from filter JSON text
    pub fn build_str(&self, json_str: &str) -> Result<WhereClause, FilterError> {
        let node = parse_filter(json_str)?;
        self.build(node.as_ref())
    }

    /// Compile a filter into a bare boolean expression (no `WHERE`)
    pub fn compile(&self, filter: &FilterNode) -> Result<(String, Vec<String>), FilterError> {
        let mut params = SqlParams::default();
        let sql = self.walk(filter, 0, &mut params)?;
        Ok((sql, params.values))
    }

    /// Compile a single `key OP operand` comparison
    pub fn compile_column_operation(
        &self,
        key: &str,
        operator: &str,
        operand: &Value,
    ) -> Result<(String, Vec<String>), FilterError> {
        let op = ColumnOp::parse(operator)?;
        let mut params = SqlParams::default();
        let sql = self.column_operation(key, op, operand, &mut params)?;
        Ok((sql, params.values))
    }

    fn walk(
        &self,
        node: &FilterNode,
        depth: usize,
        params: &mut SqlParams,
    ) -> Result<String, FilterError> {
        // Trees built in code skip the parse boundary, so shape checks repeat here.
        if depth > MAX_FILTER_DEPTH {
            return Err(FilterError::TooDeep {
                max: MAX_FILTER_DEPTH,
            });
        }
        if node.is_empty() {
            return Err(FilterError::EmptyFilter);
        }

        let mut fragments = Vec::with_capacity(node.clauses().len());
        for clause in node.clauses() {
            let fragment = match clause {
                FilterClause::Logical { op, children } => {
                    tracing::trace!(op = %op, children = children.len(), "Compiling logical clause");
                    if children.is_empty() {
                        return Err(FilterError::EmptyLogical {
                            op: op.symbol().to_string(),
                        });
                    }
                    let child_fragments = children
                        .iter()
                        .map(|child| self.walk(child, depth + 1, params))
                        .collect::<Result<Vec<_>, _>>()?;
                    join_clauses(*op, child_fragments)?
                }
                FilterClause::Property { key, condition } => match condition {
                    Condition::Equals(value) => {
                        let dialect = self.dialect();
                        let selector = self.columns.resolve(key)?;
                        let literal = encode_literal(dialect, value)?;
                        let selector = dialect.cast_selector(&selector, literal.cast);
                        params.push(literal.param);
                        format!("{} = {}", selector, literal.placeholder)
                    }
                    Condition::Compare { op, operand } => {
                        self.column_operation(key, *op, operand, params)?
                    }
                },
            };
            fragments.push(fragment);
        }

        join_clauses(LogicalOp::And, fragments)
    }

    fn column_operation(
        &self,
        key: &str,
        op: ColumnOp,
        operand: &Value,
        params: &mut SqlParams,
    ) -> Result<String, FilterError> {
        let dialect = self.dialect();
        let spec = op.spec();
        let selector = self.columns.resolve(key)?;
        tracing::trace!(key, op = %op, "Compiling column operation");

        match spec.rendering {
            Rendering::TextSearch => {
                let literal = encode_literal(dialect, operand)?;
                params.push(literal.param);
                Ok(dialect.text_search(&selector, &literal.placeholder))
            }
            Rendering::Range => {
                let bounds = operand
                    .as_array()
                    .ok_or_else(|| FilterError::OperandNotArray {
                        op: spec.symbol.to_string(),
                        actual: operand.to_string(),
                    })?;
                let [low, high] = bounds.as_slice() else {
                    return Err(FilterError::BetweenArity {
                        actual: bounds.len(),
                    });
                };
                let low = encode_literal(dialect, low)?;
                let high = encode_literal(dialect, high)?;
                let selector = dialect.cast_selector(&selector, shared_cast([&low, &high]));
                params.push(low.param);
                params.push(high.param);
                Ok(format!(
                    "{} {} {} AND {}",
                    selector, spec.sql, low.placeholder, high.placeholder
                ))
            }
            Rendering::List => {
                let items = operand
                    .as_array()
                    .ok_or_else(|| FilterError::OperandNotArray {
                        op: spec.symbol.to_string(),
                        actual: operand.to_string(),
                    })?;
                if items.is_empty() {
                    return Err(FilterError::EmptyOperandList {
                        op: spec.symbol.to_string(),
                    });
                }
                let literals = items
                    .iter()
                    .map(|item| encode_literal(dialect, item))
                    .collect::<Result<Vec<_>, _>>()?;
                let selector = dialect.cast_selector(&selector, shared_cast(&literals));
                let placeholders: Vec<String> =
                    literals.iter().map(|l| l.placeholder.clone()).collect();
                params.values.extend(literals.into_iter().map(|l| l.param));
                Ok(format!(
                    "{} {} ({})",
                    selector,
                    spec.sql,
                    placeholders.join(", ")
                ))
            }
            Rendering::Binary => {
                let literal = encode_literal(dialect, operand)?;
                let selector = dialect.cast_selector(&selector, literal.cast);
                params.push(literal.param);
                Ok(format!("{} {} {}", selector, spec.sql, literal.placeholder))
            }
        }
    }
}

/// Cast shared by every literal, `None` when they differ or are untyped
fn shared_cast<'a>(literals: impl IntoIterator<Item = &'a EncodedLiteral>) -> Option<LiteralCast> {
    let mut casts = literals.into_iter().map(|l| l.cast);
    let first = casts.next()??;
    casts.all(|c| c == Some(first)).then_some(first)
}

/// Join sibling fragments with a connective
///
/// A single fragment is returned unchanged; otherwise each fragment is
/// parenthesized and joined with the SQL keyword.
pub fn join_clauses(op: LogicalOp, mut fragments: Vec<String>) -> Result<String, FilterError> {
    if fragments.is_empty() {
        return Err(FilterError::internal(format!(
            "no clauses to join with {}",
            op.sql_keyword()
        )));
    }
    if fragments.iter().any(String::is_empty) {
        return Err(FilterError::internal(format!(
            "empty clause passed to {} join",
            op.sql_keyword()
        )));
    }
    if fragments.len() == 1 {
        return Ok(fragments.swap_remove(0));
    }

    let separator = format!(" {} ", op.sql_keyword());
    Ok(fragments
        .iter()
        .map(|f| format!("({})", f))
        .collect::<Vec<_>>()
        .join(&separator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::error::ErrorKind;
    use crate::data::sql::Backend;
    use serde_json::json;

    fn builder() -> WhereClauseBuilder {
        WhereClauseBuilder::new(FilterConfig {
            backend: Backend::Hana,
            metadata_column: "META".to_string(),
            specific_columns: vec!["name".to_string(), "body".to_string()],
        })
        .unwrap()
    }

    fn build(filter: Value) -> Result<WhereClause, FilterError> {
        builder().build_value(Some(&filter))
    }

    fn assert_parity(clause: &WhereClause) {
        assert_eq!(clause.placeholder_count(), clause.params.len());
    }

    #[test]
    fn empty_filter_identity() {
        let b = builder();
        assert_eq!(b.build(None).unwrap(), WhereClause::default());
        assert_eq!(b.build_value(None).unwrap(), WhereClause::default());
        assert_eq!(b.build_value(Some(&json!({}))).unwrap(), WhereClause::default());
        assert_eq!(b.build_value(Some(&Value::Null)).unwrap(), WhereClause::default());
        assert_eq!(b.build(Some(&FilterNode::default())).unwrap(), WhereClause::default());
    }

    #[test]
    fn single_key_not_parenthesized() {
        let clause = build(json!({"name": "alice"})).unwrap();
        assert_eq!(clause.sql, "WHERE \"name\" = ?");
        assert_eq!(clause.params, vec!["alice"]);
    }

    #[test]
    fn multiple_keys_implicitly_and() {
        let clause = build(json!({"name": "alice", "age": 30})).unwrap();
        assert_eq!(
            clause.sql,
            "WHERE (\"name\" = ?) AND (JSON_VALUE(\"META\", '$.age') = TO_DOUBLE(?))"
        );
        assert_eq!(clause.params, vec!["alice", "30"]);
        assert_parity(&clause);
    }

    #[test]
    fn equality_sugar_matches_eq_operator() {
        let sugar = build(json!({"status": "active"})).unwrap();
        let explicit = build(json!({"status": {"$eq": "active"}})).unwrap();
        assert_eq!(sugar, explicit);
    }

    #[test]
    fn nesting_preserves_parameter_order() {
        let clause = build(json!({"$or": [{"a": 1}, {"$and": [{"b": 2}, {"c": 3}]}]})).unwrap();
        assert_eq!(
            clause.sql,
            "WHERE (JSON_VALUE(\"META\", '$.a') = TO_DOUBLE(?)) OR \
             ((JSON_VALUE(\"META\", '$.b') = TO_DOUBLE(?)) AND \
             (JSON_VALUE(\"META\", '$.c') = TO_DOUBLE(?)))"
        );
        assert_eq!(clause.params, vec!["1", "2", "3"]);
    }

    #[test]
    fn single_child_connective_not_parenthesized() {
        let clause = build(json!({"$and": [{"name": "bob"}]})).unwrap();
        assert_eq!(clause.sql, "WHERE \"name\" = ?");
    }

    #[test]
    fn comparison_operators() {
        let cases = [
            ("$eq", "="),
            ("$ne", "<>"),
            ("$lt", "<"),
            ("$lte", "<="),
            ("$gt", ">"),
            ("$gte", ">="),
        ];
        for (symbol, sql_op) in cases {
            let clause = build(json!({"age": {symbol: 18}})).unwrap();
            assert_eq!(
                clause.sql,
                format!("WHERE JSON_VALUE(\"META\", '$.age') {} TO_DOUBLE(?)", sql_op)
            );
            assert_eq!(clause.params, vec!["18"]);
        }
    }

    #[test]
    fn boolean_operand() {
        let clause = build(json!({"published": {"$ne": false}})).unwrap();
        assert_eq!(
            clause.sql,
            "WHERE JSON_VALUE(\"META\", '$.published') <> TO_BOOLEAN(?)"
        );
        assert_eq!(clause.params, vec!["false"]);
    }

    #[test]
    fn date_operand() {
        let clause =
            build(json!({"created": {"$gte": {"type": "date", "date": "2024-01-01"}}})).unwrap();
        assert_eq!(
            clause.sql,
            "WHERE JSON_VALUE(\"META\", '$.created') >= TO_DATE(?)"
        );
        assert_eq!(clause.params, vec!["2024-01-01"]);
    }

    #[test]
    fn in_and_not_in() {
        let clause = build(json!({"lang": {"$in": ["en", 2, true]}})).unwrap();
        assert_eq!(
            clause.sql,
            "WHERE JSON_VALUE(\"META\", '$.lang') IN (?, TO_DOUBLE(?), TO_BOOLEAN(?))"
        );
        assert_eq!(clause.params, vec!["en", "2", "true"]);

        let clause = build(json!({"name": {"$nin": ["a", "b"]}})).unwrap();
        assert_eq!(clause.sql, "WHERE \"name\" NOT IN (?, ?)");
        assert_eq!(clause.params, vec!["a", "b"]);
    }

    #[test]
    fn in_requires_array() {
        let err = build(json!({"lang": {"$in": "en"}})).unwrap_err();
        assert!(matches!(err, FilterError::OperandNotArray { ref op, .. } if op == "$in"));
    }

    #[test]
    fn empty_in_rejected() {
        let err = build(json!({"lang": {"$nin": []}})).unwrap_err();
        assert!(matches!(err, FilterError::EmptyOperandList { ref op } if op == "$nin"));
    }

    #[test]
    fn between() {
        let clause = build(json!({"year": {"$between": [2000, 2010]}})).unwrap();
        assert_eq!(
            clause.sql,
            "WHERE JSON_VALUE(\"META\", '$.year') BETWEEN TO_DOUBLE(?) AND TO_DOUBLE(?)"
        );
        assert_eq!(clause.params, vec!["2000", "2010"]);
    }

    #[test]
    fn between_arity() {
        for operand in [json!([1]), json!([1, 2, 3]), json!([])] {
            let err = build(json!({"year": {"$between": operand}})).unwrap_err();
            assert!(matches!(err, FilterError::BetweenArity { .. }));
        }
        let err = build(json!({"year": {"$between": 5}})).unwrap_err();
        assert!(matches!(err, FilterError::OperandNotArray { .. }));
    }

    #[test]
    fn like() {
        let clause = build(json!({"name": {"$like": "al%"}})).unwrap();
        assert_eq!(clause.sql, "WHERE \"name\" LIKE ?");
        assert_eq!(clause.params, vec!["al%"]);
    }

    #[test]
    fn contains_uses_text_search() {
        let clause = build(json!({"body": {"$contains": "rust"}})).unwrap();
        assert_eq!(
            clause.sql,
            "WHERE SCORE(? IN (\"body\" EXACT SEARCH MODE 'text')) > 0"
        );
        assert_eq!(clause.params, vec!["rust"]);
    }

    #[test]
    fn non_integer_operand_rejected() {
        let err = build(json!({"score": {"$gt": 0.5}})).unwrap_err();
        assert!(matches!(err, FilterError::NonIntegerNumber { .. }));
        assert_eq!(err.kind(), ErrorKind::UnsupportedValue);
    }

    #[test]
    fn array_as_equality_value_rejected() {
        let err = build(json!({"tags": ["a", "b"]})).unwrap_err();
        assert!(matches!(err, FilterError::UnsupportedValue { .. }));
    }

    #[test]
    fn null_operand_rejected() {
        let err = build(json!({"name": {"$eq": null}})).unwrap_err();
        assert!(matches!(err, FilterError::MissingOperand));
    }

    #[test]
    fn empty_logical_built_in_code_is_caller_error() {
        let node = FilterNode::new(vec![FilterClause::logical(LogicalOp::Or, vec![])]);
        let err = builder().build(Some(&node)).unwrap_err();
        assert!(matches!(err, FilterError::EmptyLogical { ref op } if op == "$or"));
        assert_eq!(err.kind(), ErrorKind::MalformedExpression);
        assert!(!err.is_internal());
    }

    #[test]
    fn depth_limit_applies_to_trees_built_in_code() {
        let mut node = FilterNode::new(vec![FilterClause::equals("a", json!(1))]);
        for _ in 0..MAX_FILTER_DEPTH {
            node = FilterNode::new(vec![FilterClause::logical(LogicalOp::And, vec![node])]);
        }
        assert!(builder().build(Some(&node)).is_ok());

        let node = FilterNode::new(vec![FilterClause::logical(LogicalOp::And, vec![node])]);
        let err = builder().build(Some(&node)).unwrap_err();
        assert!(matches!(err, FilterError::TooDeep { .. }));
    }

    #[test]
    fn invalid_generic_key_rejected() {
        let err = build(json!({"a') OR ('1'='1": "x"})).unwrap_err();
        assert!(matches!(err, FilterError::InvalidPropertyKey { .. }));
    }

    #[test]
    fn compile_column_operation_contract() {
        let b = builder();
        let (sql, params) = b
            .compile_column_operation("age", "$between", &json!([1, 9]))
            .unwrap();
        assert_eq!(
            sql,
            "JSON_VALUE(\"META\", '$.age') BETWEEN TO_DOUBLE(?) AND TO_DOUBLE(?)"
        );
        assert_eq!(params, vec!["1", "9"]);

        let err = b.compile_column_operation("age", "$and", &json!([])).unwrap_err();
        assert_eq!(err.to_string(), "Did not expect a logical operator here: $and");

        let err = b.compile_column_operation("age", "$near", &json!(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperator);
    }

    #[test]
    fn compile_rejects_empty_node() {
        let err = builder().compile(&FilterNode::default()).unwrap_err();
        assert!(matches!(err, FilterError::EmptyFilter));
    }

    #[test]
    fn programmatic_tree() {
        let filter = FilterNode::new(vec![
            FilterClause::compare("age", ColumnOp::Gt, json!(21)),
            FilterClause::logical(
                LogicalOp::Or,
                vec![
                    FilterNode::new(vec![FilterClause::equals("name", json!("x"))]),
                    FilterNode::new(vec![FilterClause::equals("name", json!("y"))]),
                ],
            ),
        ]);
        let clause = builder().build(Some(&filter)).unwrap();
        assert_eq!(
            clause.sql,
            "WHERE (JSON_VALUE(\"META\", '$.age') > TO_DOUBLE(?)) AND ((\"name\" = ?) OR (\"name\" = ?))"
        );
        assert_eq!(clause.params, vec!["21", "x", "y"]);
    }

    #[test]
    fn programmatic_non_integer_equality_rejected() {
        let filter = FilterNode::new(vec![FilterClause::equals("score", json!(1.5))]);
        let err = builder().build(Some(&filter)).unwrap_err();
        assert!(matches!(err, FilterError::NonIntegerNumber { .. }));
    }

    #[test]
    fn build_str_entry_point() {
        let clause = builder()
            .build_str(r#"{"name": {"$in": ["a"]}, "rank": {"$lte": 3}}"#)
            .unwrap();
        assert_eq!(
            clause.sql,
            "WHERE (\"name\" IN (?)) AND (JSON_VALUE(\"META\", '$.rank') <= TO_DOUBLE(?))"
        );
        assert_parity(&clause);
        assert!(builder().build_str("  ").unwrap().is_empty());
    }

    #[test]
    fn duckdb_backend_rendering() {
        let b = WhereClauseBuilder::new(FilterConfig {
            backend: Backend::Duckdb,
            metadata_column: "meta".to_string(),
            specific_columns: vec!["body".to_string()],
        })
        .unwrap();
        let clause = b
            .build_value(Some(&json!({"body": {"$contains": "db"}, "n": {"$lt": 4}})))
            .unwrap();
        assert_eq!(
            clause.sql,
            "WHERE (contains(\"body\", ?)) AND \
             (TRY_CAST(json_extract_string(\"meta\", '$.n') AS DOUBLE) < ?::DOUBLE)"
        );
        assert_eq!(clause.params, vec!["db", "4"]);

        let clause = b
            .build_value(Some(&json!({"tag": {"$in": ["a", 1]}, "k": {"$between": [1, 2]}})))
            .unwrap();
        assert_eq!(
            clause.sql,
            "WHERE (json_extract_string(\"meta\", '$.tag') IN (?, ?::DOUBLE)) AND \
             (TRY_CAST(json_extract_string(\"meta\", '$.k') AS DOUBLE) BETWEEN ?::DOUBLE AND ?::DOUBLE)"
        );
    }

    #[test]
    fn append_to_base_statement() {
        let clause = build(json!({"name": "a"})).unwrap();
        assert_eq!(
            clause.append_to("SELECT * FROM docs "),
            "SELECT * FROM docs WHERE \"name\" = ?"
        );
        assert_eq!(
            WhereClause::default().append_to("DELETE FROM docs"),
            "DELETE FROM docs"
        );
    }

    #[test]
    fn parity_over_mixed_filter() {
        let clause = build(json!({
            "$and": [
                {"name": {"$like": "a%"}},
                {"$or": [
                    {"year": {"$between": [1990, 1999]}},
                    {"lang": {"$nin": ["fr", "it", "es"]}},
                    {"body": {"$contains": "vector"}}
                ]},
                {"draft": false}
            ]
        }))
        .unwrap();
        assert_parity(&clause);
        assert_eq!(
            clause.params,
            vec!["a%", "1990", "1999", "fr", "it", "es", "vector", "false"]
        );
    }

    #[test]
    fn join_clauses_rules() {
        assert_eq!(
            join_clauses(LogicalOp::Or, vec!["a = ?".into()]).unwrap(),
            "a = ?"
        );
        assert_eq!(
            join_clauses(LogicalOp::And, vec!["a = ?".into(), "b = ?".into()]).unwrap(),
            "(a = ?) AND (b = ?)"
        );
        assert!(join_clauses(LogicalOp::And, vec![]).unwrap_err().is_internal());
        assert!(
            join_clauses(LogicalOp::Or, vec!["a = ?".into(), String::new()])
                .unwrap_err()
                .is_internal()
        );
    }

    #[test]
    fn builder_is_shareable_across_threads() {
        let b = std::sync::Arc::new(builder());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let b = b.clone();
                std::thread::spawn(move || b.build_value(Some(&json!({"rank": i}))).unwrap())
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            let clause = handle.join().unwrap();
            assert_eq!(clause.params, vec![i.to_string()]);
        }
    }
}
