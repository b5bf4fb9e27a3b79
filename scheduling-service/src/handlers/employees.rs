//! Employee routes. Bound, but nothing behind them yet: each answers with a
//! fixed acknowledgement.

use axum::extract::Path;

/// GET /employees
pub async fn list_employees() -> &'static str {
    "GET all employees"
}

/// GET /employees/:id
pub async fn get_employee(Path(id): Path<String>) -> &'static str {
    tracing::debug!(employee_id = %id, "Employee lookup not implemented");
    "GET employee details"
}

/// POST /employees
pub async fn create_employee() -> &'static str {
    "CREATE new employee"
}

/// PUT /employees/:id
pub async fn update_employee(Path(id): Path<String>) -> &'static str {
    tracing::debug!(employee_id = %id, "Employee update not implemented");
    "UPDATE employee details"
}

/// DELETE /employees/:id
pub async fn delete_employee(Path(id): Path<String>) -> &'static str {
    tracing::debug!(employee_id = %id, "Employee delete not implemented");
    "DELETE employee"
}
