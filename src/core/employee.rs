//! Employee business logic - hiring, lookups and deactivation.

use crate::{
    entities::{Employee, employee},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Retrieves all active employees ordered alphabetically by name.
pub async fn get_all_active_employees(db: &DatabaseConnection) -> Result<Vec<employee::Model>> {
    Employee::find()
        .filter(employee::Column::IsActive.eq(true))
        .order_by_asc(employee::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an active employee by exact name.
pub async fn get_employee_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<employee::Model>> {
    Employee::find()
        .filter(employee::Column::Name.eq(name.trim()))
        .filter(employee::Column::IsActive.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an employee by id, active or not.
pub async fn get_employee_by_id(
    db: &DatabaseConnection,
    employee_id: i64,
) -> Result<Option<employee::Model>> {
    Employee::find_by_id(employee_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Adds an employee with a monthly salary baseline.
pub async fn create_employee(
    db: &DatabaseConnection,
    name: &str,
    role: &str,
    monthly_salary: f64,
    joined_at: DateTime<Utc>,
) -> Result<employee::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput {
            message: "Employee name cannot be empty".to_string(),
        });
    }
    if !monthly_salary.is_finite() || monthly_salary < 0.0 {
        return Err(Error::InvalidAmount {
            amount: monthly_salary,
        });
    }
    if get_employee_by_name(db, name).await?.is_some() {
        return Err(Error::InvalidInput {
            message: format!("An active employee named '{name}' already exists"),
        });
    }

    let model = employee::ActiveModel {
        name: Set(name.to_string()),
        role: Set(role.trim().to_string()),
        monthly_salary: Set(monthly_salary),
        is_active: Set(true),
        joined_at: Set(joined_at),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    info!(employee = %created.name, "Added employee");
    Ok(created)
}

/// Changes an employee's monthly salary.
pub async fn update_salary(
    db: &DatabaseConnection,
    employee_id: i64,
    monthly_salary: f64,
) -> Result<employee::Model> {
    if !monthly_salary.is_finite() || monthly_salary < 0.0 {
        return Err(Error::InvalidAmount {
            amount: monthly_salary,
        });
    }

    let employee = get_employee_by_id(db, employee_id)
        .await?
        .ok_or_else(|| Error::EmployeeNotFound {
            name: employee_id.to_string(),
        })?;

    let mut active: employee::ActiveModel = employee.into();
    active.monthly_salary = Set(monthly_salary);
    active.update(db).await.map_err(Into::into)
}

/// Soft-deletes an employee.
pub async fn deactivate_employee(
    db: &DatabaseConnection,
    employee_id: i64,
) -> Result<employee::Model> {
    let employee = get_employee_by_id(db, employee_id)
        .await?
        .ok_or_else(|| Error::EmployeeNotFound {
            name: employee_id.to_string(),
        })?;

    let mut active: employee::ActiveModel = employee.into();
    active.is_active = Set(false);
    active.update(db).await.map_err(Into::into)
}
