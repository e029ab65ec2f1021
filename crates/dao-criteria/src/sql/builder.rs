//! Criteria to SQL translation.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::core::identifier::validate_alias;
use crate::core::{BoundCommand, ClassMapping, ConnectionDescriptor, MappingId, MappingRegistry, Value};
use crate::error::{CriteriaError, Result};
use crate::expression::{
    CompareOp, DaoCriteria, DaoJoinCriteria, Expression, Invertible, JoinExpression, JoinOp, JoinSide,
    JoinType, MultiJoinExpression, PropertyValueExpression, SortDirection, SpatialExpression,
    SpatialPredicate,
};

use super::SqlClause;

/// Table alias of the left (primary) source of a join.
const LEFT_ALIAS: &str = "t0";
/// Table alias of the right source of a join.
const RIGHT_ALIAS: &str = "t1";

/// A mapped source and how its columns are written in the statement.
struct Source<'m> {
    mapping: &'m ClassMapping,
    descriptor: &'m dyn ConnectionDescriptor,
    qualifier: Option<String>,
}

impl<'m> Source<'m> {
    fn bare(mapping: &'m ClassMapping, descriptor: &'m dyn ConnectionDescriptor) -> Self {
        Self {
            mapping,
            descriptor,
            qualifier: None,
        }
    }

    fn aliased(
        mapping: &'m ClassMapping,
        descriptor: &'m dyn ConnectionDescriptor,
        qualifier: String,
    ) -> Self {
        Self {
            mapping,
            descriptor,
            qualifier: Some(qualifier),
        }
    }

    /// Quoted column of `property`, qualified with the table alias when there is one.
    fn column(&self, property: &str, expression: &str) -> Result<String> {
        if property.is_empty() {
            return Err(CriteriaError::invalid(expression, "property"));
        }
        let column = self
            .descriptor
            .quote_ident(self.mapping.column_for(property)?)?;
        Ok(match &self.qualifier {
            Some(q) => format!("{}.{}", q, column),
            None => column,
        })
    }

    /// `table` or `table alias`, as written after FROM/JOIN.
    fn table_reference(&self) -> Result<String> {
        let table = self.descriptor.quote_table(&self.mapping.table)?;
        Ok(match &self.qualifier {
            Some(q) => format!("{} {}", table, q),
            None => table,
        })
    }
}

/// Renders criteria for one descriptor against one mapping registry.
///
/// The builder is a cheap borrow of both; create one per query or keep one
/// around, it holds no state of its own.
#[derive(Clone, Copy)]
pub struct QueryBuilder<'a> {
    descriptor: &'a dyn ConnectionDescriptor,
    registry: &'a MappingRegistry,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(descriptor: &'a dyn ConnectionDescriptor, registry: &'a MappingRegistry) -> Self {
        Self {
            descriptor,
            registry,
        }
    }

    pub fn descriptor(&self) -> &'a dyn ConnectionDescriptor {
        self.descriptor
    }

    /// `SELECT <columns> FROM <table> [WHERE ...] [ORDER BY ...]`.
    ///
    /// # Errors
    ///
    /// Fails on unknown mappings or properties, on expressions missing a
    /// required field, and on predicates the descriptor cannot express.
    pub fn select(&self, mapping: MappingId, criteria: &DaoCriteria) -> Result<SqlClause> {
        let class = self.registry.require(mapping)?;
        let source = Source::bare(class, self.descriptor);

        let columns = class
            .columns()
            .map(|(_, column)| self.descriptor.quote_ident(column))
            .collect::<Result<Vec<_>>>()?;
        let list = if columns.is_empty() {
            "*".to_string()
        } else {
            columns.join(", ")
        };

        let mut clause = SqlClause::new(format!(
            "SELECT {} FROM {}",
            list,
            source.table_reference()?
        ));
        self.push_where(&mut clause, &[(criteria, &source)])?;
        self.push_order_by(&mut clause, &[(criteria, &source)])?;

        debug!("Select for {}: {}", class.name, clause.sql);
        Ok(clause)
    }

    /// `SELECT COUNT(*) FROM <table> [WHERE ...]`. Sort orders are ignored.
    pub fn count(&self, mapping: MappingId, criteria: &DaoCriteria) -> Result<SqlClause> {
        let class = self.registry.require(mapping)?;
        let source = Source::bare(class, self.descriptor);

        let mut clause = SqlClause::new(format!(
            "SELECT COUNT(*) FROM {}",
            source.table_reference()?
        ));
        self.push_where(&mut clause, &[(criteria, &source)])?;

        debug!("Count for {}: {}", class.name, clause.sql);
        Ok(clause)
    }

    /// The boolean condition of `criteria` alone, `None` when it is empty.
    pub fn where_clause(
        &self,
        mapping: MappingId,
        criteria: &DaoCriteria,
    ) -> Result<Option<SqlClause>> {
        let class = self.registry.require(mapping)?;
        self.render_criteria(criteria, &Source::bare(class, self.descriptor))
    }

    /// `SELECT ... FROM left JOIN right ON ... [JOIN other ON ...] [WHERE ...]`.
    ///
    /// Each distinct (mapping, alias) pair among the multi-joins becomes one
    /// extra inner join against the left source. Multi-joins sharing a pair
    /// contribute AND-ed conditions to the same join.
    ///
    /// # Errors
    ///
    /// Besides the errors of [`select`](Self::select), fails with
    /// `AmbiguousMultiJoin` when a mapping is referenced by several
    /// multi-joins and one of them has no alias.
    pub fn join_select(&self, join: &DaoJoinCriteria) -> Result<SqlClause> {
        let left_class = self.registry.require(join.left())?;
        let right_class = self.registry.require(join.right())?;
        let left = Source::aliased(left_class, self.descriptor, self.table_alias(LEFT_ALIAS));
        let right = Source::aliased(right_class, self.descriptor, self.table_alias(RIGHT_ALIAS));

        let mut select_list = self.select_list(&left, LEFT_ALIAS)?;
        select_list.extend(self.select_list(&right, RIGHT_ALIAS)?);

        let mut clause = SqlClause::new(format!(
            "SELECT {} FROM {} {} {} ON ",
            select_list.join(", "),
            left.table_reference()?,
            self.join_keyword(join.join_type()),
            right.table_reference()?
        ));

        if join.expressions().is_empty() {
            clause.push_sql("1=1");
        } else {
            let conditions = join
                .expressions()
                .iter()
                .map(|e| self.render_join_expression(e, &left, &right))
                .collect::<Result<Vec<_>>>()?;
            clause.append(SqlClause::join(conditions, " AND "));
        }

        for extra in self.multi_join_clauses(join, &left)? {
            clause.append(extra);
        }

        let sides = [
            (join.left_criteria(), &left),
            (join.right_criteria(), &right),
        ];
        self.push_where(&mut clause, &sides)?;
        self.push_order_by(&mut clause, &sides)?;

        debug!(
            "Join select {} -> {}: {}",
            left_class.name, right_class.name, clause.sql
        );
        Ok(clause)
    }

    /// Rewrite a rendered clause into the descriptor's native parameter syntax.
    pub fn bind(&self, clause: &SqlClause) -> Result<BoundCommand> {
        self.descriptor.bind_parameters(&clause.sql, &clause.params)
    }

    // ===== Statement pieces =====

    fn table_alias(&self, alias: &str) -> String {
        format!(
            "{}{}{}",
            self.descriptor.table_alias_prefix(),
            alias,
            self.descriptor.table_alias_suffix()
        )
    }

    fn join_keyword(&self, join_type: JoinType) -> &str {
        match join_type {
            JoinType::Inner => "INNER JOIN",
            JoinType::LeftOuter => "LEFT OUTER JOIN",
            JoinType::RightOuter => "RIGHT OUTER JOIN",
            JoinType::FullOuter => self.descriptor.full_outer_join_keyword(),
        }
    }

    /// Qualified columns of one join source, aliased `<alias>_<column>` when
    /// the descriptor requires explicit column aliases.
    fn select_list(&self, source: &Source<'_>, alias: &str) -> Result<Vec<String>> {
        let qualifier = source.qualifier.as_deref().unwrap_or(alias);
        let columns: Vec<&str> = source.mapping.columns().map(|(_, c)| c).collect();
        if columns.is_empty() {
            return Ok(vec![format!("{}.*", qualifier)]);
        }

        let d = self.descriptor;
        columns
            .into_iter()
            .map(|column| {
                let expr = format!("{}.{}", qualifier, d.quote_ident(column)?);
                if !d.needs_explicit_column_aliases() {
                    return Ok(expr);
                }
                let separator = if d.needs_as_for_column_aliases() {
                    " AS "
                } else {
                    " "
                };
                let suffix = d.column_alias_suffix();
                let mut name = format!("{}_{}", alias, column);
                if !suffix.is_empty() {
                    name = name.replace(suffix, &suffix.repeat(2));
                }
                Ok(format!(
                    "{}{}{}{}{}",
                    expr,
                    separator,
                    d.column_alias_prefix(),
                    name,
                    suffix
                ))
            })
            .collect()
    }

    fn push_where(&self, clause: &mut SqlClause, parts: &[(&DaoCriteria, &Source<'_>)]) -> Result<()> {
        let mut rendered = Vec::new();
        for (criteria, source) in parts {
            if let Some(part) = self.render_criteria(criteria, source)? {
                rendered.push(part);
            }
        }
        if rendered.is_empty() {
            return Ok(());
        }

        if rendered.len() > 1 {
            rendered = rendered
                .into_iter()
                .map(|part| SqlClause {
                    sql: format!("({})", part.sql),
                    params: part.params,
                })
                .collect();
        }
        clause.push_sql(" WHERE ");
        clause.append(SqlClause::join(rendered, " AND "));
        Ok(())
    }

    fn push_order_by(
        &self,
        clause: &mut SqlClause,
        parts: &[(&DaoCriteria, &Source<'_>)],
    ) -> Result<()> {
        let mut terms = Vec::new();
        for (criteria, source) in parts {
            for order in criteria.orders() {
                let column = source.column(&order.property, "SortOrder")?;
                let direction = match order.direction {
                    SortDirection::Ascending => "ASC",
                    SortDirection::Descending => "DESC",
                };
                terms.push(format!("{} {}", column, direction));
            }
        }
        if !terms.is_empty() {
            clause.push_sql(" ORDER BY ");
            clause.push_sql(&terms.join(", "));
        }
        Ok(())
    }

    // ===== Multi-joins =====

    fn multi_join_clauses(
        &self,
        join: &DaoJoinCriteria,
        primary: &Source<'_>,
    ) -> Result<Vec<SqlClause>> {
        let multi_joins = join.multi_joins();
        if multi_joins.is_empty() {
            return Ok(Vec::new());
        }

        let mut references: HashMap<MappingId, usize> = HashMap::new();
        for mj in multi_joins {
            *references.entry(mj.other_mapping()).or_default() += 1;
        }
        for mj in multi_joins {
            if mj.other_alias().is_none() && references[&mj.other_mapping()] > 1 {
                return Err(CriteriaError::AmbiguousMultiJoin {
                    mapping: self.registry.require(mj.other_mapping())?.name.clone(),
                    alias: None,
                });
            }
        }

        // Group by (mapping, alias), keeping first-seen order.
        let mut groups: Vec<((MappingId, Option<&str>), Vec<&MultiJoinExpression>)> = Vec::new();
        for mj in multi_joins {
            let key = (mj.other_mapping(), mj.other_alias());
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, members)) => members.push(mj),
                None => groups.push((key, vec![mj])),
            }
        }

        let mut taken: HashSet<String> = [LEFT_ALIAS, RIGHT_ALIAS]
            .iter()
            .map(|a| a.to_string())
            .collect();
        for ((_, alias), _) in &groups {
            if let Some(alias) = alias {
                validate_alias(alias)?;
                if !taken.insert(alias.to_string()) {
                    return Err(CriteriaError::invalid(
                        format!("MultiJoinExpression (alias '{}' already in use)", alias),
                        "other_alias",
                    ));
                }
            }
        }

        let mut next = 2;
        let mut clauses = Vec::with_capacity(groups.len());
        for ((mapping, alias), members) in groups {
            let alias = match alias {
                Some(alias) => alias.to_string(),
                None => loop {
                    let candidate = format!("t{}", next);
                    next += 1;
                    if taken.insert(candidate.clone()) {
                        break candidate;
                    }
                },
            };

            let class = self.registry.require(mapping)?;
            let other = Source::aliased(class, self.descriptor, self.table_alias(&alias));
            let conditions = members
                .into_iter()
                .map(|mj| self.render_multi_join(mj, primary, &other))
                .collect::<Result<Vec<_>>>()?;

            let mut clause =
                SqlClause::new(format!(" INNER JOIN {} ON ", other.table_reference()?));
            clause.append(SqlClause::join(conditions, " AND "));
            clauses.push(clause);
        }
        Ok(clauses)
    }

    fn render_multi_join(
        &self,
        mj: &MultiJoinExpression,
        primary: &Source<'_>,
        other: &Source<'_>,
    ) -> Result<SqlClause> {
        let (left, right) = if mj.other_is_left() {
            (other, primary)
        } else {
            (primary, other)
        };
        let clause = SqlClause::new(format!(
            "{} {} {}",
            left.column(mj.left_property(), "MultiJoinExpression")?,
            mj.op().sql_operator(),
            right.column(mj.right_property(), "MultiJoinExpression")?
        ));
        Ok(negate_unless(clause, mj.true_or_not()))
    }

    // ===== Expressions =====

    fn render_criteria(
        &self,
        criteria: &DaoCriteria,
        source: &Source<'_>,
    ) -> Result<Option<SqlClause>> {
        if criteria.is_empty() {
            return Ok(None);
        }
        let parts = criteria
            .expressions()
            .iter()
            .map(|e| self.render_expression(e, source))
            .collect::<Result<Vec<_>>>()?;
        let separator = format!(" {} ", criteria.operator().sql_keyword());
        Ok(Some(SqlClause::join(parts, &separator)))
    }

    fn render_expression(&self, expression: &Expression, source: &Source<'_>) -> Result<SqlClause> {
        match expression {
            Expression::Compare(e) => self.render_compare(e, source),
            Expression::InList(e) => {
                let column = source.column(e.property(), "PropertyInListExpression")?;
                if e.values().is_empty() {
                    return Err(CriteriaError::invalid("PropertyInListExpression", "values"));
                }
                let not = if e.true_or_not() { "" } else { "NOT " };
                let mut clause = SqlClause::new(format!("{} {}IN (", column, not));
                for (i, value) in e.values().iter().enumerate() {
                    if i > 0 {
                        clause.push_sql(", ");
                    }
                    clause.push_param(value.clone());
                }
                clause.push_sql(")");
                Ok(clause)
            }
            Expression::Null(e) => {
                let column = source.column(e.property(), "PropertyNullExpression")?;
                Ok(is_null_clause(column, e.true_or_not()))
            }
            Expression::BitwiseAnd(e) => {
                let column = source.column(e.property(), "BitwiseAndExpression")?;
                let mut clause = SqlClause {
                    sql: self.descriptor.bitwise_and_clause(&column)?,
                    params: vec![Value::Int(e.mask())],
                };
                clause.push_sql(if e.true_or_not() { " = " } else { " <> " });
                clause.push_param(e.mask());
                Ok(clause)
            }
            Expression::Spatial(e) => self.render_spatial(e, source),
            Expression::Nested(e) => {
                let inner = match self.render_criteria(e.criteria(), source)? {
                    Some(inner) => SqlClause {
                        sql: format!("({})", inner.sql),
                        params: inner.params,
                    },
                    None => SqlClause::new("(1=1)"),
                };
                if e.true_or_not() {
                    Ok(inner)
                } else {
                    Ok(SqlClause {
                        sql: format!("NOT {}", inner.sql),
                        params: inner.params,
                    })
                }
            }
        }
    }

    fn render_compare(&self, e: &PropertyValueExpression, source: &Source<'_>) -> Result<SqlClause> {
        let column = source.column(e.property(), "PropertyValueExpression")?;
        let positive = e.true_or_not();
        let not = if positive { "" } else { "NOT " };

        let clause = match e.op() {
            CompareOp::Equal if e.value().is_null() => is_null_clause(column, positive),
            CompareOp::Equal => {
                let mut clause =
                    SqlClause::new(format!("{} {} ", column, if positive { "=" } else { "<>" }));
                clause.push_param(e.value().clone());
                clause
            }
            CompareOp::Like => {
                let mut clause = SqlClause::new(format!("{} {}LIKE ", column, not));
                clause.push_param(e.value().clone());
                clause
            }
            CompareOp::LikeIgnoreCase => {
                let lower = self.descriptor.lower_case_function();
                let mut clause =
                    SqlClause::new(format!("{}({}) {}LIKE {}(", lower, column, not, lower));
                clause.push_param(e.value().clone());
                clause.push_sql(")");
                clause
            }
            op => {
                let mut clause = SqlClause::new(format!("{} {} ", column, op.sql_operator()));
                clause.push_param(e.value().clone());
                negate_unless(clause, positive)
            }
        };
        Ok(clause)
    }

    fn render_spatial(&self, e: &SpatialExpression, source: &Source<'_>) -> Result<SqlClause> {
        let column = source.column(e.property(), "SpatialExpression")?;
        let srid = e.shape().srid();
        let wkt = Value::Text(e.shape().wkt().to_string());

        let clause = match e.predicate() {
            SpatialPredicate::Distance {
                distance,
                direction,
            } => {
                let mut clause = SqlClause {
                    sql: self.descriptor.spatial_distance_clause(&column, srid)?,
                    params: vec![wkt],
                };
                clause.push_sql(&format!(" {} ", direction.sql_operator()));
                clause.push_param(distance);
                clause
            }
            SpatialPredicate::Intersects => SqlClause {
                sql: self.descriptor.spatial_intersects_clause(&column, srid)?,
                params: vec![wkt],
            },
        };
        Ok(negate_unless(clause, e.true_or_not()))
    }

    fn render_join_expression(
        &self,
        e: &JoinExpression,
        left: &Source<'_>,
        right: &Source<'_>,
    ) -> Result<SqlClause> {
        match e {
            JoinExpression::PropertyValue {
                side,
                property,
                value,
                op,
                true_or_not,
            } => {
                let source = match side {
                    JoinSide::Left => left,
                    JoinSide::Right => right,
                };
                let column = source.column(property, "JoinExpression")?;
                if *op == JoinOp::Equal && value.is_null() {
                    return Ok(is_null_clause(column, *true_or_not));
                }
                let mut clause = SqlClause::new(format!("{} {} ", column, op.sql_operator()));
                clause.push_param(value.clone());
                Ok(negate_unless(clause, *true_or_not))
            }
            JoinExpression::Property {
                left_property,
                right_property,
                op,
                true_or_not,
            } => {
                let clause = SqlClause::new(format!(
                    "{} {} {}",
                    left.column(left_property, "JoinExpression")?,
                    op.sql_operator(),
                    right.column(right_property, "JoinExpression")?
                ));
                Ok(negate_unless(clause, *true_or_not))
            }
        }
    }
}

impl std::fmt::Debug for QueryBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("descriptor", &self.descriptor.name())
            .field("mappings", &self.registry.len())
            .finish()
    }
}

fn negate_unless(clause: SqlClause, true_or_not: bool) -> SqlClause {
    if true_or_not {
        clause
    } else {
        clause.negated()
    }
}

fn is_null_clause(column: String, true_or_not: bool) -> SqlClause {
    let not = if true_or_not { "" } else { "NOT " };
    SqlClause::new(format!("{} IS {}NULL", column, not))
}
