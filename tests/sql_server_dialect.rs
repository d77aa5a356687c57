mod common;

use common::*;
use indoc::indoc;
use rowhouse::{
    ArgumentError, Conditions, Dialect, Page, SchemaError, SchemaFactory, SqlServerDialect,
    TableNameConvention,
};
use std::sync::Arc;

fn dialect() -> SqlServerDialect {
    SqlServerDialect::new()
}

fn schemas() -> SchemaFactory {
    SchemaFactory::new(Arc::new(SqlServerDialect::new()))
}

/// Temporary table names must carry the leading hash.
struct HashPrefixedNames;

impl TableNameConvention for HashPrefixedNames {
    fn table_name(&self, entity_name: &str) -> String {
        format!("#{}", entity_name)
    }
}

#[test]
fn count_selects_from_given_table() {
    let schema = schemas().table_schema::<User>();
    let sql = dialect().make_count_statement(&schema, "");
    assert_eq!(
        sql,
        indoc! {"
            SELECT COUNT(*)
            FROM [Users]"}
    );
}

#[test]
fn count_adds_conditions() {
    let schema = schemas().table_schema::<User>();
    let sql = dialect().make_count_statement(&schema, "WHERE Foo IS NOT NULL");
    assert_eq!(
        sql,
        indoc! {"
            SELECT COUNT(*)
            FROM [Users]
            WHERE Foo IS NOT NULL"}
    );
}

#[test]
fn find_selects_by_inferred_key() {
    let schema = schemas().table_schema::<User>();
    let sql = dialect().make_find_statement(&schema).unwrap();
    assert_eq!(
        sql,
        indoc! {"
            SELECT [Id], [Name], [Age]
            FROM [Users]
            WHERE [Id] = @Id"}
    );
}

#[test]
fn find_uses_non_default_primary_key_name() {
    let schema = schemas().table_schema::<KeyExplicit>();
    let sql = dialect().make_find_statement(&schema).unwrap();
    assert_eq!(
        sql,
        indoc! {"
            SELECT [Key], [Name]
            FROM [KeyExplicit]
            WHERE [Key] = @Key"}
    );
}

#[test]
fn find_uses_each_key_in_composite_key() {
    let schema = schemas().table_schema::<CompositeKeys>();
    let sql = dialect().make_find_statement(&schema).unwrap();
    assert_eq!(
        sql,
        indoc! {"
            SELECT [Key1], [Key2], [Name]
            FROM [CompositeKeys]
            WHERE [Key1] = @Key1 AND [Key2] = @Key2"}
    );
}

#[test]
fn find_aliases_renamed_primary_key() {
    let schema = schemas().table_schema::<KeyAlias>();
    let sql = dialect().make_find_statement(&schema).unwrap();
    assert_eq!(
        sql,
        indoc! {"
            SELECT [Key] AS [Id], [Name]
            FROM [KeyAlias]
            WHERE [Key] = @Id"}
    );
}

#[test]
fn find_aliases_renamed_column() {
    let schema = schemas().table_schema::<PropertyAlias>();
    let sql = dialect().make_find_statement(&schema).unwrap();
    assert_eq!(
        sql,
        indoc! {"
            SELECT [Id], [YearsOld] AS [Age]
            FROM [PropertyAlias]
            WHERE [Id] = @Id"}
    );
}

#[test]
fn find_fails_without_primary_key() {
    let schema = schemas().table_schema::<NoKey>();
    let error = dialect().make_find_statement(&schema).unwrap_err();
    assert!(matches!(
        error.downcast_ref::<SchemaError>(),
        Some(SchemaError::InvalidPrimaryKey { .. })
    ));
}

#[test]
fn get_range_selects_all_rows() {
    let schema = schemas().table_schema::<User>();
    let sql = dialect().make_get_range_statement(&schema, "");
    assert_eq!(
        sql,
        indoc! {"
            SELECT [Id], [Name], [Age]
            FROM [Users]"}
    );
}

#[test]
fn get_range_adds_conditions_clause() {
    let schema = schemas().table_schema::<User>();
    let sql = dialect().make_get_range_statement(&schema, "WHERE Age > @Age");
    assert_eq!(
        sql,
        indoc! {"
            SELECT [Id], [Name], [Age]
            FROM [Users]
            WHERE Age > @Age"}
    );
}

#[test]
fn get_top_n_prefixes_top() {
    let schema = schemas().table_schema::<User>();
    let sql = dialect().make_get_top_n_statement(&schema, 1, "", "Name");
    assert_eq!(
        sql,
        indoc! {"
            SELECT TOP 1 [Id], [Name], [Age]
            FROM [Users]
            ORDER BY Name"}
    );
}

#[test]
fn get_top_n_tolerates_missing_order() {
    let schema = schemas().table_schema::<User>();
    let sql = dialect().make_get_top_n_statement(&schema, 1, "", " ");
    assert_eq!(
        sql,
        indoc! {"
            SELECT TOP 1 [Id], [Name], [Age]
            FROM [Users]"}
    );
}

#[test]
fn get_page_requires_an_order() {
    let schema = schemas().table_schema::<User>();
    let page = Page::compute(100, 1, 10).unwrap();
    for order_by in ["", " "] {
        let error = dialect()
            .make_get_page_statement(&schema, &page, "", order_by)
            .unwrap_err();
        assert!(error.downcast_ref::<ArgumentError>().is_some());
    }
}

#[test]
fn get_page_selects_first_window() {
    let schema = schemas().table_schema::<User>();
    let page = Page::compute(100, 1, 10).unwrap();
    let sql = dialect()
        .make_get_page_statement(&schema, &page, "", "Name")
        .unwrap();
    assert_eq!(
        sql,
        indoc! {"
            SELECT [Id], [Name], [Age]
            FROM [Users]
            ORDER BY Name
            OFFSET 0 ROWS FETCH NEXT 10 ROWS ONLY"}
    );
}

#[test]
fn get_page_selects_second_window() {
    let schema = schemas().table_schema::<User>();
    let page = Page::compute(100, 2, 10).unwrap();
    let sql = dialect()
        .make_get_page_statement(&schema, &page, "WHERE Name LIKE 'Foo%'", "Name")
        .unwrap();
    assert_eq!(
        sql,
        indoc! {"
            SELECT [Id], [Name], [Age]
            FROM [Users]
            WHERE Name LIKE 'Foo%'
            ORDER BY Name
            OFFSET 10 ROWS FETCH NEXT 10 ROWS ONLY"}
    );
}

#[test]
fn insert_excludes_generated_key() {
    let schema = schemas().table_schema::<User>();
    let sql = dialect().make_insert_statement(&schema);
    assert_eq!(
        sql,
        indoc! {"
            INSERT INTO [Users] ([Name], [Age])
            VALUES (@Name, @Age);"}
    );
}

#[test]
fn insert_includes_not_generated_key() {
    let schema = schemas().table_schema::<KeyNotGenerated>();
    let sql = dialect().make_insert_statement(&schema);
    assert_eq!(
        sql,
        indoc! {"
            INSERT INTO [KeyNotGenerated] ([Id], [Name])
            VALUES (@Id, @Name);"}
    );
}

#[test]
fn insert_excludes_computed_columns() {
    let schema = schemas().table_schema::<PropertyComputed>();
    let sql = dialect().make_insert_statement(&schema);
    assert_eq!(
        sql,
        indoc! {"
            INSERT INTO [PropertyComputed] ([Name])
            VALUES (@Name);"}
    );
}

#[test]
fn insert_excludes_generated_columns() {
    let schema = schemas().table_schema::<PropertyGenerated>();
    let sql = dialect().make_insert_statement(&schema);
    assert_eq!(
        sql,
        indoc! {"
            INSERT INTO [PropertyGenerated] ([Name])
            VALUES (@Name);"}
    );
}

#[test]
fn insert_returning_key_batches_scope_identity() {
    let schema = schemas().table_schema::<User>();
    let sql = dialect()
        .make_insert_returning_key_statement(&schema)
        .unwrap();
    assert_eq!(
        sql,
        indoc! {"
            INSERT INTO [Users] ([Name], [Age])
            VALUES (@Name, @Age);
            SELECT CAST(SCOPE_IDENTITY() AS BIGINT) AS [id]"}
    );
}

#[test]
fn update_sets_non_key_columns() {
    let schema = schemas().table_schema::<User>();
    let sql = dialect().make_update_statement(&schema).unwrap();
    assert_eq!(
        sql,
        indoc! {"
            UPDATE [Users]
            SET [Name] = @Name, [Age] = @Age
            WHERE [Id] = @Id"}
    );
}

#[test]
fn update_still_includes_generated_columns() {
    let schema = schemas().table_schema::<PropertyGenerated>();
    let sql = dialect().make_update_statement(&schema).unwrap();
    assert_eq!(
        sql,
        indoc! {"
            UPDATE [PropertyGenerated]
            SET [Name] = @Name, [Created] = @Created
            WHERE [Id] = @Id"}
    );
}

#[test]
fn update_uses_each_key_in_composite_key() {
    let schema = schemas().table_schema::<CompositeKeys>();
    let sql = dialect().make_update_statement(&schema).unwrap();
    assert_eq!(
        sql,
        indoc! {"
            UPDATE [CompositeKeys]
            SET [Name] = @Name
            WHERE [Key1] = @Key1 AND [Key2] = @Key2"}
    );
}

#[test]
fn delete_by_key_filters_on_primary_keys() {
    let schema = schemas().table_schema::<User>();
    let sql = dialect().make_delete_by_key_statement(&schema).unwrap();
    assert_eq!(
        sql,
        indoc! {"
            DELETE FROM [Users]
            WHERE [Id] = @Id"}
    );
}

#[test]
fn delete_range_appends_conditions() {
    let schema = schemas().table_schema::<User>();
    let sql = dialect().make_delete_range_statement(&schema, "WHERE Age > @Age");
    assert_eq!(
        sql,
        indoc! {"
            DELETE FROM [Users]
            WHERE Age > @Age"}
    );
}

#[test]
fn where_clause_brackets_column_names() {
    let schemas = schemas();
    let conditions = NameAgeCondition {
        name: Some("Bobby".into()),
        age: Some(5),
    };
    let resolved = schemas
        .conditions_schema::<User, NameAgeCondition>(&conditions)
        .unwrap();
    let clause = dialect().make_where_clause(&resolved, &conditions.condition_values());
    assert_eq!(clause, "WHERE [Name] = @Name AND [Age] = @Age");
}

#[test]
fn create_temp_table_declares_all_columns() {
    let schemas = schemas().with_table_names(HashPrefixedNames);
    let schema = schemas.table_schema::<TempUser>();
    let sql = dialect().make_create_temp_table_statement(&schema).unwrap();
    assert_eq!(
        sql,
        indoc! {"
            CREATE TABLE [#TempUser]
            (
                [Id] INT NOT NULL,
                [Name] NVARCHAR(50) NOT NULL,
                [Notes] NVARCHAR(MAX) NULL,
                [Balance] NUMERIC NOT NULL,
                [Active] BIT NOT NULL,
                [Reference] UNIQUEIDENTIFIER NULL,
                [Created] DATETIME2(7) NOT NULL
            );"}
    );
}

#[test]
fn create_temp_table_requires_hash_prefix() {
    let schema = schemas().table_schema::<TempUser>();
    let error = dialect()
        .make_create_temp_table_statement(&schema)
        .unwrap_err();
    assert!(error.downcast_ref::<ArgumentError>().is_some());
}

#[test]
fn create_temp_table_requires_columns() {
    let schemas = schemas().with_table_names(HashPrefixedNames);
    let schema = schemas.table_schema::<NoColumns>();
    let error = dialect()
        .make_create_temp_table_statement(&schema)
        .unwrap_err();
    assert!(error.downcast_ref::<ArgumentError>().is_some());
}

#[test]
fn drop_temp_table_uses_bracketed_name() {
    let schemas = schemas().with_table_names(HashPrefixedNames);
    let schema = schemas.table_schema::<TempUser>();
    let sql = dialect().make_drop_temp_table_statement(&schema);
    assert_eq!(sql, "DROP TABLE [#TempUser]");
}
