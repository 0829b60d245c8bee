use std::sync::Arc;

use crate::{Collection, CollectionName, DocumentStore, Employee, EmployeeUpdate, RecordId, Result};

/// Employee records service
#[derive(Clone)]
pub struct EmployeeService {
    employees: Collection<Employee>,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            employees: Collection::new(store, CollectionName::Employees),
        }
    }

    /// Every employee, unpaginated
    pub async fn list(&self) -> Result<Vec<Employee>> {
        self.employees.find_all().await
    }

    /// Store a new employee and return its generated id
    pub async fn create(&self, mut employee: Employee) -> Result<RecordId> {
        employee.id = None;
        let id = self.employees.insert(&employee).await?;
        tracing::info!(employee_id = %id, "employee created");
        Ok(id)
    }

    /// Get an employee by id
    ///
    /// # Arguments
    /// * `id` - 24-hex-character identifier; any other shape is `StoreError::InvalidId`
    pub async fn get(&self, id: &str) -> Result<Option<Employee>> {
        let id = RecordId::parse(id)?;
        self.employees.find_by_id(&id).await
    }

    /// Apply a partial update. Returns the updated record, or `None` when no
    /// employee has this id.
    pub async fn update(&self, id: &str, changes: &EmployeeUpdate) -> Result<Option<Employee>> {
        let id = RecordId::parse(id)?;
        let updated = self.employees.update_by_id(&id, changes).await?;
        if updated.is_some() {
            tracing::info!(employee_id = %id, "employee updated");
        }
        Ok(updated)
    }

    /// Delete an employee; `false` when it did not exist
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let id = RecordId::parse(id)?;
        let deleted = self.employees.delete_by_id(&id).await?;
        if deleted {
            tracing::info!(employee_id = %id, "employee deleted");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, StoreError};

    fn service() -> EmployeeService {
        EmployeeService::new(Arc::new(MemoryStore::new()))
    }

    fn employee(first_name: &str) -> Employee {
        Employee {
            id: None,
            first_name: first_name.to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            position: "Engineer".to_string(),
            salary: 90000.0,
            date_of_joining: "2024-01-01".to_string(),
            department: "R&D".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = service();
        let id = service.create(employee("Ada")).await.unwrap();

        let stored = service.get(&id.to_hex()).await.unwrap().unwrap();
        assert_eq!(stored.id, Some(id));
        assert_eq!(stored.first_name, "Ada");
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let service = service();
        let id = service.create(employee("Ada")).await.unwrap().to_hex();

        let changes = EmployeeUpdate {
            position: Some("Principal".to_string()),
            salary: Some(150000.0),
            ..Default::default()
        };
        let updated = service.update(&id, &changes).await.unwrap().unwrap();

        assert_eq!(updated.position, "Principal");
        assert_eq!(updated.salary, 150000.0);
        assert_eq!(updated.first_name, "Ada");
        assert_eq!(updated.department, "R&D");
    }

    #[tokio::test]
    async fn test_empty_update_is_a_no_op() {
        let service = service();
        let id = service.create(employee("Ada")).await.unwrap().to_hex();

        let updated = service.update(&id, &EmployeeUpdate::default()).await.unwrap().unwrap();
        assert_eq!(updated.first_name, "Ada");
    }

    #[tokio::test]
    async fn test_missing_records() {
        let service = service();
        let id = RecordId::new().to_hex();

        assert!(service.get(&id).await.unwrap().is_none());
        assert!(service.update(&id, &EmployeeUpdate::default()).await.unwrap().is_none());
        assert!(!service.delete(&id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let service = service();
        let id = service.create(employee("Ada")).await.unwrap().to_hex();

        assert!(service.delete(&id).await.unwrap());
        assert!(!service.delete(&id).await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_id_is_a_format_error() {
        let service = service();
        let err = service.get("not-a-valid-id").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidId(_)));
    }
}
