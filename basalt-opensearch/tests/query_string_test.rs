use basalt_opensearch::error::QueryValidationError;
use basalt_opensearch::query_string::{
    DefaultOperator, Fuzziness, MultiMatchType, NamedArgument, QueryStringParam,
    QueryStringQuery, RewriteMethod,
};
use serde_json::json;

fn fields(names: &[&str]) -> Vec<(String, f32)> {
    names.iter().map(|name| (name.to_string(), 1.0)).collect()
}

#[test]
fn test_mandatory_params() {
    let query = QueryStringQuery::try_new(
        vec![
            ("Tags".to_string(), 1.5),
            ("Title".to_string(), 1.0),
            ("Body".to_string(), 4.2),
        ],
        "taste",
        vec![],
    )
    .unwrap();

    assert_eq!(DefaultOperator::Or, query.default_operator());
    assert_eq!(Fuzziness::Auto, query.fuzziness());
    assert_eq!(MultiMatchType::BestFields, query.multi_match_type());
    assert_eq!(1.0, query.boost());
    assert_eq!(50, query.fuzzy_max_expansions());
    assert_eq!(10000, query.max_determinized_states());
    assert!(query.allow_leading_wildcard());
    assert!(!query.lenient());

    assert_eq!(
        json!({
            "query_string": {
                "query": "taste",
                "fields": ["Tags^1.5", "Title^1", "Body^4.2"]
            }
        }),
        query.to_query_dsl().unwrap()
    );
}

#[test]
fn test_wildcard_fields() {
    for field in ["*", "T*", "*Date"] {
        assert!(QueryStringQuery::try_new(fields(&[field]), "taste", vec![]).is_ok());
    }
}

#[test]
fn test_all_params() {
    let args = vec![
        NamedArgument::new("escape", false),
        NamedArgument::new("allow_leading_wildcard", true),
        NamedArgument::new("enable_position_increments", true),
        NamedArgument::new("fuzziness", 1i64),
        NamedArgument::new("fuzzy_rewrite", "constant_score"),
        NamedArgument::new("max_determinized_states", 10000i64),
        NamedArgument::new("analyzer", "english"),
        NamedArgument::new("analyze_wildcard", false),
        NamedArgument::new("quote_field_suffix", ".exact"),
        NamedArgument::new("auto_generate_synonyms_phrase_query", true),
        NamedArgument::new("boost", 0.77),
        NamedArgument::new("quote_analyzer", "standard"),
        NamedArgument::new("phrase_slop", 0i64),
        NamedArgument::new("rewrite", "constant_score"),
        NamedArgument::new("type", "best_fields"),
        NamedArgument::new("tie_breaker", 0.3),
        NamedArgument::new("time_zone", "Canada/Pacific"),
        NamedArgument::new("default_operator", "or"),
        NamedArgument::new("fuzzy_transpositions", false),
        NamedArgument::new("lenient", true),
        NamedArgument::new("fuzzy_max_expansions", 25i64),
        NamedArgument::new("minimum_should_match", "2<-25% 9<-3"),
        NamedArgument::new("fuzzy_prefix_length", 7i64),
    ];

    let query =
        QueryStringQuery::try_new(fields(&["Body", "Tags", "Title"]), "taste beer", args).unwrap();
    let options = query.options();
    assert_eq!(Some(Fuzziness::Edits(1)), options.fuzziness);
    assert_eq!(Some(RewriteMethod::ConstantScore), options.fuzzy_rewrite);
    assert_eq!(Some(0.77), options.boost);
    assert_eq!(Some(25), options.fuzzy_max_expansions);
    assert_eq!(Some("2<-25% 9<-3".to_string()), options.minimum_should_match);
    assert!(query.lenient());

    let dsl = query.to_query_dsl().unwrap();
    let clause = &dsl["query_string"];
    assert_eq!(json!("taste beer"), clause["query"]);
    assert_eq!(json!("1"), clause["fuzziness"]);
    assert_eq!(json!("best_fields"), clause["type"]);
    assert_eq!(json!("or"), clause["default_operator"]);
    assert_eq!(json!("Canada/Pacific"), clause["time_zone"]);
    assert_eq!(json!(7), clause["fuzzy_prefix_length"]);
    assert_eq!(json!(false), clause["escape"]);
    // 23 parameters plus query and fields.
    assert_eq!(25, clause.as_object().unwrap().len());
}

#[test]
fn test_param_names_case_insensitive() {
    let query = QueryStringQuery::try_new(
        fields(&["Title"]),
        "taste",
        vec![
            NamedArgument::new("Default_Operator", "AND"),
            NamedArgument::new("LENIENT", "TRUE"),
        ],
    )
    .unwrap();

    assert_eq!(DefaultOperator::And, query.default_operator());
    assert!(query.lenient());
}

#[test]
fn test_invalid_calls() {
    assert_eq!(
        Err(QueryValidationError::EmptyFields),
        QueryStringQuery::try_new(vec![], "taste", vec![])
    );
    assert_eq!(
        Err(QueryValidationError::EmptyQuery),
        QueryStringQuery::try_new(fields(&["Title"]), "  ", vec![])
    );
    assert!(matches!(
        QueryStringQuery::try_new(vec![("Title".to_string(), -1.0)], "taste", vec![]),
        Err(QueryValidationError::InvalidFieldWeight { .. })
    ));
    assert_eq!(
        Err(QueryValidationError::UnknownParameter("fuzzyness".to_string())),
        QueryStringQuery::try_new(
            fields(&["Title"]),
            "taste",
            vec![NamedArgument::new("fuzzyness", 1i64)]
        )
    );
    assert_eq!(
        Err(QueryValidationError::DuplicateParameter(QueryStringParam::Boost)),
        QueryStringQuery::try_new(
            fields(&["Title"]),
            "taste",
            vec![NamedArgument::new("boost", 1.0), NamedArgument::new("BOOST", 2.0)]
        )
    );
}

#[test]
fn test_invalid_values() {
    let cases = vec![
        NamedArgument::new("escape", "maybe"),
        NamedArgument::new("boost", -1.0),
        NamedArgument::new("boost", "high"),
        NamedArgument::new("default_operator", "xor"),
        NamedArgument::new("fuzziness", 3i64),
        NamedArgument::new("fuzzy_max_expansions", 0i64),
        NamedArgument::new("fuzzy_prefix_length", -1i64),
        NamedArgument::new("rewrite", "fastest"),
        NamedArgument::new("minimum_should_match", "most"),
        NamedArgument::new("phrase_slop", 1.5),
        NamedArgument::new("tie_breaker", 1.5),
        NamedArgument::new("time_zone", "somewhere"),
        NamedArgument::new("type", "best"),
        NamedArgument::new("analyzer", 1i64),
    ];

    for arg in cases {
        let name = arg.name.clone();
        let result = QueryStringQuery::try_new(fields(&["Title"]), "taste", vec![arg]);
        assert!(
            matches!(result, Err(QueryValidationError::InvalidValue { .. })),
            "{} accepted: {:?}",
            name,
            result
        );
    }
}
