#[cfg(test)]
mod tests {
    use crate::router::INVENTORY_LIST_BY_DATE;
    use crate::schemas::ApiDoc;
    use utoipa::openapi::PathItemType;
    use utoipa::OpenApi;

    fn object_properties(name: &str) -> Vec<String> {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.expect("components");
        match components.schemas.get(name) {
            Some(utoipa::openapi::RefOr::T(utoipa::openapi::schema::Schema::Object(obj))) => {
                obj.properties.keys().cloned().collect()
            }
            _ => panic!("{} should be an object schema", name),
        }
    }

    #[test]
    fn test_openapi_schema_generation() {
        let openapi = ApiDoc::openapi();

        let components = openapi.components.as_ref().unwrap();
        for schema in ["ErrorResponse", "HealthResponse", "InventoryResponse", "ProfileResponse"] {
            assert!(components.schemas.contains_key(schema), "missing schema {}", schema);
        }

        assert!(serde_json::to_string(&openapi).is_ok());
    }

    #[test]
    fn test_error_response_schema_structure() {
        let properties = object_properties("ErrorResponse");
        for field in ["error", "code", "success"] {
            assert!(properties.iter().any(|p| p == field));
        }
    }

    #[test]
    fn test_inventory_response_schema_structure() {
        let properties = object_properties("InventoryResponse");
        for field in ["id", "name", "metadata", "language_id", "type_id", "tags", "created_at", "updated_at"] {
            assert!(properties.iter().any(|p| p == field), "missing field {}", field);
        }
    }

    #[test]
    fn test_every_route_is_documented() {
        let openapi = ApiDoc::openapi();
        let paths = &openapi.paths.paths;

        let expected = [
            ("/health", vec![PathItemType::Get]),
            ("/api/v1/inventory-languages", vec![PathItemType::Get, PathItemType::Post]),
            (
                "/api/v1/inventory-languages/{language_id}",
                vec![PathItemType::Get, PathItemType::Put, PathItemType::Delete],
            ),
            ("/api/v1/inventory-tags", vec![PathItemType::Get, PathItemType::Post]),
            (
                "/api/v1/inventory-tags/{tag_id}",
                vec![PathItemType::Get, PathItemType::Put, PathItemType::Delete],
            ),
            ("/api/v1/inventory-types", vec![PathItemType::Get, PathItemType::Post]),
            (
                "/api/v1/inventory-types/{type_id}",
                vec![PathItemType::Get, PathItemType::Put, PathItemType::Delete],
            ),
            ("/api/v1/inventories", vec![PathItemType::Get, PathItemType::Post]),
            (INVENTORY_LIST_BY_DATE, vec![PathItemType::Get]),
            (
                "/api/v1/inventories/{inventory_id}",
                vec![PathItemType::Get, PathItemType::Put, PathItemType::Delete],
            ),
            ("/api/v1/profiles", vec![PathItemType::Get, PathItemType::Post]),
            ("/api/v1/profiles/by-email/{email}", vec![PathItemType::Get]),
            (
                "/api/v1/profiles/{profile_id}",
                vec![PathItemType::Get, PathItemType::Put, PathItemType::Delete],
            ),
        ];

        for (path, methods) in expected {
            let item = paths.get(path).unwrap_or_else(|| panic!("missing path {}", path));
            for method in methods {
                let name = match method {
                    PathItemType::Get => "GET",
                    PathItemType::Post => "POST",
                    PathItemType::Put => "PUT",
                    PathItemType::Delete => "DELETE",
                    _ => "other",
                };
                assert!(item.operations.contains_key(&method), "missing {} {}", name, path);
            }
        }
        assert_eq!(paths.len(), 13);
    }

    #[test]
    fn test_by_date_documents_bad_request() {
        let openapi = ApiDoc::openapi();
        let operation = openapi.paths.paths[INVENTORY_LIST_BY_DATE]
            .operations
            .get(&PathItemType::Get)
            .unwrap();

        assert!(operation.responses.responses.contains_key("200"));
        assert!(operation.responses.responses.contains_key("400"));
    }
}
