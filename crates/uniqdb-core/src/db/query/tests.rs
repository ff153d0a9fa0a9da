use super::*;
use crate::{
    model::{entity::EntityModel, field::EntityFieldModel},
    test_support::{Account, Listing},
    traits::EntitySchema,
    value::Value,
};
use proptest::prelude::*;

fn listing() -> ConditionBuilder {
    ConditionBuilder::for_entity::<Listing>()
}

#[test]
fn renders_every_fragment_kind_in_fixed_order() {
    let query = listing()
        .equality_group([
            Condition::new("fieldGroup0", 1u64),
            Condition::is_null("fieldGroup1"),
        ])
        .at_least("field0", 2u64)
        .at_most("field1", 3u64)
        .like_all([Condition::is_null("field2"), Condition::new("field3", "value1")])
        .join(JoinOperator::Or)
        .page(PageRequest::of(1, 200))
        .to_sql_query()
        .unwrap();

    assert_eq!(
        query.sql(),
        "( fieldGroup0 LIKE ? AND fieldGroup1 IS NULL ) OR field0 >= ? OR field1 <= ? \
         OR field2 IS NULL OR field3 LIKE ? LIMIT 200 OFFSET 200"
    );
    assert_eq!(
        query.args(),
        [
            Value::Uint(1),
            Value::Uint(2),
            Value::Uint(3),
            Value::Text("value1".to_string()),
        ]
    );
    assert_eq!(query.entity(), "Listing");
}

#[test]
fn defaults_to_and_without_pagination() {
    let query = listing()
        .like("field2", "a")
        .like("field3", "b")
        .to_sql_query()
        .unwrap();

    assert_eq!(query.sql(), "field2 LIKE ? AND field3 LIKE ?");
}

#[test]
fn empty_model_renders_pagination_only() {
    let model = listing().page(PageRequest::of(0, 10)).build().unwrap();
    assert!(model.is_unconstrained());

    let query = model.into_sql_query();
    assert_eq!(query.sql(), " LIMIT 10 OFFSET 0");
    assert!(query.args().is_empty());

    let query = listing().to_sql_query().unwrap();
    assert_eq!(query.sql(), "");
}

#[test]
fn empty_equality_groups_are_skipped() {
    let query = listing()
        .equality_group(Vec::<Condition>::new())
        .like("field3", "x")
        .join(JoinOperator::Or)
        .to_sql_query()
        .unwrap();

    assert_eq!(query.sql(), "field3 LIKE ?");
}

#[test]
fn pagination_renders_sort_then_limit() {
    let page = Pageable::from(PageRequest::of(1, 100).with_sort(Sort::by("field1").descending()));
    let query = SqlQuery::pagination(Listing::MODEL, &page);

    assert_eq!(query.sql(), " ORDER BY field1 DESC LIMIT 100 OFFSET 100");
}

#[test]
fn sort_renders_multiple_orders_and_null_handling() {
    let sort = Sort::from_orders([Order::desc("field0").nulls_last(), Order::asc("title")]);
    let query = SqlQuery::sorted(Listing::MODEL, &sort);

    assert_eq!(query.sql(), " ORDER BY field0 DESC NULLS LAST, title ASC");
    assert_eq!(SqlQuery::sorted(Listing::MODEL, &Sort::unsorted()).sql(), "");
}

#[test]
fn count_strips_order_by_tail() {
    let query = listing()
        .like("field3", "x")
        .page(PageRequest::of(2, 5).with_sort(Sort::by("field0")))
        .to_sql_query()
        .unwrap();

    let count = query.count();
    assert_eq!(count.sql(), "COUNT (*) field3 LIKE ?");
    assert_eq!(count.args(), query.args());
    assert_eq!(count.entity(), query.entity());
}

#[test]
fn count_strips_limit_tail_without_order() {
    let query = listing()
        .at_least("field0", 7u64)
        .page(PageRequest::of(0, 20))
        .to_sql_query()
        .unwrap();

    assert_eq!(query.count().sql(), "COUNT (*) field0 >= ?");
}

#[test]
fn count_keeps_untailed_predicate() {
    let query = listing().like("field3", "x").to_sql_query().unwrap();

    assert_eq!(query.count().sql(), "COUNT (*) field3 LIKE ?");
}

static KEYWORD_FIELDS: [EntityFieldModel; 3] = [
    EntityFieldModel::plain("id"),
    EntityFieldModel::indexed("name"),
    EntityFieldModel::indexed("LIMIT"),
];

static KEYWORD_MODEL: EntityModel = EntityModel {
    path: "query::tests::Keyword",
    entity_name: "Keyword",
    primary_key: &KEYWORD_FIELDS[0],
    fields: &KEYWORD_FIELDS,
};

#[test]
fn count_cuts_at_the_predicate_boundary_for_keyword_fields() {
    let query = ConditionBuilder::new()
        .entity(&KEYWORD_MODEL)
        .like("name", "a")
        .like("LIMIT", "b")
        .join(JoinOperator::Or)
        .page(PageRequest::of(0, 10))
        .to_sql_query()
        .unwrap();
    assert_eq!(query.sql(), "name LIKE ? OR LIMIT LIKE ? LIMIT 10 OFFSET 0");

    let count = query.count();
    assert_eq!(count.sql(), "COUNT (*) name LIKE ? OR LIMIT LIKE ?");
    assert_eq!(count.sql().matches('?').count(), count.args().len());

    let sorted = ConditionBuilder::new()
        .entity(&KEYWORD_MODEL)
        .like("LIMIT", "b")
        .page(PageRequest::of(1, 5).with_sort(Sort::by("LIMIT")))
        .to_sql_query()
        .unwrap();
    assert_eq!(
        sorted.sql(),
        "LIMIT LIKE ? ORDER BY LIMIT ASC LIMIT 5 OFFSET 5"
    );
    assert_eq!(sorted.count().sql(), "COUNT (*) LIMIT LIKE ?");
}

#[test]
fn count_of_unfiltered_listing_drops_the_whole_tail() {
    let page = Pageable::from(PageRequest::of(0, 10).with_sort(Sort::by("field0")));
    let count = SqlQuery::pagination(Listing::MODEL, &page).count();

    assert_eq!(count.sql(), "COUNT (*) ");
    assert!(count.args().is_empty());
}

#[test]
fn build_requires_entity() {
    let err = ConditionBuilder::new().like("field3", "x").build().unwrap_err();

    assert!(matches!(err, QueryError::MissingEntity));
    assert_eq!(
        InternalError::from(err).class,
        ErrorClass::InvalidArgument
    );
}

#[test]
fn build_rejects_unknown_and_malformed_fields() {
    let err = listing().like("nope", "x").build().unwrap_err();
    assert!(matches!(err, QueryError::UnknownField { .. }));

    let err = listing()
        .like("title LIMIT 1", "x")
        .build()
        .unwrap_err();
    assert!(matches!(err, QueryError::InvalidFieldName(_)));

    let err = listing()
        .page(PageRequest::of(0, 5).with_sort(Sort::by("email")))
        .build()
        .unwrap_err();
    assert!(matches!(err, QueryError::UnknownField { .. }));
}

#[test]
fn build_rejects_null_range_and_zero_page_size() {
    let err = listing()
        .at_least("field0", Value::Null)
        .build()
        .unwrap_err();
    assert!(matches!(err, QueryError::NullComparison { .. }));

    let err = listing().page(PageRequest::of(0, 0)).build().unwrap_err();
    assert!(matches!(err, QueryError::ZeroPageSize));
}

#[test]
fn fields_are_checked_against_the_bound_entity() {
    let err = ConditionBuilder::for_entity::<Account>()
        .like("field3", "x")
        .build()
        .unwrap_err();

    assert!(matches!(
        err,
        QueryError::UnknownField { ref field, .. } if field == "field3"
    ));
}

#[test]
fn page_corrects_understated_total() {
    let request = PageRequest::of(2, 10);

    let page = Page::new(vec![1, 2, 3], request.clone().into(), 0);
    assert_eq!(page.total_elements(), 23);
    assert_eq!(page.total_pages(), 3);
    assert!(page.is_last());

    let page = Page::new(vec![1; 10], request.into(), 95);
    assert_eq!(page.total_elements(), 95);
    assert_eq!(page.total_pages(), 10);
    assert!(!page.is_last());

    let page: Page<u8> = Page::new(Vec::new(), PageRequest::of(4, 10).into(), 12);
    assert_eq!(page.total_elements(), 12);
}

#[test]
fn unpaged_page_holds_everything() {
    let page = Page::unpaged(vec!["a", "b"]);

    assert_eq!(page.total_elements(), 2);
    assert_eq!(page.total_pages(), 1);
    assert!(page.is_last());
    assert_eq!(page.into_content(), ["a", "b"]);
}

#[test]
fn page_request_navigation() {
    let request = PageRequest::of(3, 25).with_sort(Sort::by("title"));
    let next = request.next();

    assert_eq!(request.offset(), 75);
    assert_eq!(next.page(), 4);
    assert_eq!(next.sort(), request.sort());
    assert_eq!(Pageable::Unpaged.offset(), 0);
}

// (kind, field index, value): kind 0 = equality group, 1 = `>=`, 2 = `<=`,
// 3 = LIKE / IS NULL.
fn fragment() -> impl Strategy<Value = (usize, usize, Option<u64>)> {
    (0usize..4, 0usize..4, proptest::option::of(any::<u64>()))
}

fn like_condition(field: &str, value: Option<u64>) -> Condition {
    match value {
        Some(v) => Condition::new(field, v),
        None => Condition::is_null(field),
    }
}

fn like_sql(field: &str, value: Option<u64>) -> String {
    match value {
        Some(_) => format!("{field} LIKE ?"),
        None => format!("{field} IS NULL"),
    }
}

proptest! {
    #[test]
    fn or_joined_fragments_render_in_fixed_kind_order(
        fragments in proptest::collection::vec(fragment(), 1..12)
    ) {
        const FIELDS: [&str; 4] = ["field0", "field1", "field2", "field3"];

        let mut builder = listing().join(JoinOperator::Or);
        let mut expected: Vec<(usize, String, Option<u64>)> = Vec::new();
        for &(kind, field, value) in &fragments {
            let field = FIELDS[field];
            let (sql, arg) = match kind {
                0 => {
                    builder = builder.equality_group([like_condition(field, value)]);
                    (format!("( {} )", like_sql(field, value)), value)
                }
                1 => {
                    let v = value.unwrap_or_default();
                    builder = builder.at_least(field, v);
                    (format!("{field} >= ?"), Some(v))
                }
                2 => {
                    let v = value.unwrap_or_default();
                    builder = builder.at_most(field, v);
                    (format!("{field} <= ?"), Some(v))
                }
                _ => {
                    builder = builder.like_all([like_condition(field, value)]);
                    (like_sql(field, value), value)
                }
            };
            expected.push((kind, sql, arg));
        }

        // stable: insertion order is kept within a kind
        expected.sort_by_key(|entry| entry.0);
        let expected_sql: Vec<&str> = expected.iter().map(|entry| entry.1.as_str()).collect();
        let expected_args: Vec<Value> = expected
            .iter()
            .filter_map(|entry| entry.2.map(Value::Uint))
            .collect();

        let query = builder.to_sql_query().unwrap();

        let expected_joined = expected_sql.join(" OR ");
        prop_assert_eq!(query.sql(), expected_joined.as_str());
        prop_assert_eq!(query.sql().matches(" OR ").count(), fragments.len() - 1);
        prop_assert_eq!(query.sql().matches('?').count(), expected_args.len());
        prop_assert_eq!(query.args(), expected_args.as_slice());
    }
}
