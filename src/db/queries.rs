//! Data access layer: one function per (entity, operation) pair.
//!
//! Every query is parameterized. Uniqueness violations surface as
//! [`StoreError::Duplicate`], zero-row mutations as [`StoreError::NotFound`],
//! everything else as [`StoreError::Database`] so handlers can map each kind
//! to its own response.

use thiserror::Error;

use super::models::{AdminUser, AssetRow, Employee, EmployeeUpdate, NewAsset, NewEmployee, Ticket};
use super::DbPool;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate entry")]
    Duplicate,
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Classify an insert/update failure, separating uniqueness violations from
/// everything else.
fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.message().contains("UNIQUE constraint failed") {
            return StoreError::Duplicate;
        }
    }
    StoreError::Database(err)
}

/// Row visibility for list operations. Admin callers see every row;
/// everyone else is pinned to a single company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    All,
    Company(String),
}

// ---------------------------------------------------------------------------
// Admin users
// ---------------------------------------------------------------------------

pub async fn insert_admin(
    pool: &DbPool,
    username: &str,
    password_hash: &str,
    role: &str,
    company: &str,
    email: Option<&str>,
) -> Result<i64, StoreError> {
    let result = sqlx::query(
        "INSERT INTO users (username, password_hash, role, company, email) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(username)
    .bind(password_hash)
    .bind(role)
    .bind(company)
    .bind(email)
    .execute(pool)
    .await
    .map_err(classify)?;

    Ok(result.last_insert_rowid())
}

pub async fn find_admin_by_email(
    pool: &DbPool,
    email: &str,
) -> Result<Option<AdminUser>, StoreError> {
    let admin =
        sqlx::query_as::<_, AdminUser>("SELECT * FROM users WHERE email = ? AND role = 'admin'")
            .bind(email)
            .fetch_optional(pool)
            .await?;
    Ok(admin)
}

pub async fn list_admins(pool: &DbPool, scope: &ListScope) -> Result<Vec<AdminUser>, StoreError> {
    let admins = match scope {
        ListScope::All => {
            sqlx::query_as::<_, AdminUser>("SELECT * FROM users ORDER BY id")
                .fetch_all(pool)
                .await?
        }
        ListScope::Company(company) => {
            sqlx::query_as::<_, AdminUser>("SELECT * FROM users WHERE company = ? ORDER BY id")
                .bind(company)
                .fetch_all(pool)
                .await?
        }
    };
    Ok(admins)
}

/// Addresses for the admin ticket alert. Best-effort callers tolerate an
/// empty result.
pub async fn admin_emails(pool: &DbPool) -> Result<Vec<String>, StoreError> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT email FROM users WHERE role = 'admin' AND email IS NOT NULL")
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(|(email,)| email).collect())
}

// ---------------------------------------------------------------------------
// Employees
// ---------------------------------------------------------------------------

pub async fn insert_employee(pool: &DbPool, employee: &NewEmployee) -> Result<i64, StoreError> {
    let result = sqlx::query(
        "INSERT INTO employees (username, emp_id, email, password_hash, company, role, team) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&employee.username)
    .bind(&employee.emp_id)
    .bind(&employee.email)
    .bind(&employee.password_hash)
    .bind(&employee.company)
    .bind(&employee.role)
    .bind(&employee.team)
    .execute(pool)
    .await
    .map_err(classify)?;

    Ok(result.last_insert_rowid())
}

/// Login lookup. Company always constrains the match; team only when the
/// caller supplied one.
pub async fn find_employee_by_login(
    pool: &DbPool,
    email: &str,
    company: &str,
    team: Option<&str>,
) -> Result<Option<Employee>, StoreError> {
    let employee = match team {
        Some(team) => {
            sqlx::query_as::<_, Employee>(
                "SELECT * FROM employees \
                 WHERE email = ? AND role = 'employee' AND company = ? AND team = ?",
            )
            .bind(email)
            .bind(company)
            .bind(team)
            .fetch_optional(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Employee>(
                "SELECT * FROM employees WHERE email = ? AND role = 'employee' AND company = ?",
            )
            .bind(email)
            .bind(company)
            .fetch_optional(pool)
            .await?
        }
    };
    Ok(employee)
}

pub async fn list_employees(pool: &DbPool, scope: &ListScope) -> Result<Vec<Employee>, StoreError> {
    let employees = match scope {
        ListScope::All => {
            sqlx::query_as::<_, Employee>("SELECT * FROM employees ORDER BY id")
                .fetch_all(pool)
                .await?
        }
        ListScope::Company(company) => {
            sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE company = ? ORDER BY id")
                .bind(company)
                .fetch_all(pool)
                .await?
        }
    };
    Ok(employees)
}

pub async fn update_employee(
    pool: &DbPool,
    id: i64,
    update: &EmployeeUpdate,
) -> Result<(), StoreError> {
    let result = sqlx::query(
        "UPDATE employees SET username = ?, emp_id = ?, email = ?, company = ?, role = ?, team = ? \
         WHERE id = ?",
    )
    .bind(&update.username)
    .bind(&update.emp_id)
    .bind(&update.email)
    .bind(&update.company)
    .bind(&update.role)
    .bind(&update.team)
    .bind(id)
    .execute(pool)
    .await
    .map_err(classify)?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

pub async fn delete_employee(pool: &DbPool, id: i64) -> Result<(), StoreError> {
    let result = sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

/// (email, username) for the ticket confirmation. A dangling emp_id resolves
/// to `None`, never an error.
pub async fn employee_contact(
    pool: &DbPool,
    emp_id: &str,
) -> Result<Option<(String, String)>, StoreError> {
    let row: Option<(String, String)> =
        sqlx::query_as("SELECT email, username FROM employees WHERE emp_id = ? LIMIT 1")
            .bind(emp_id)
            .fetch_optional(pool)
            .await?;
    Ok(row)
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

pub async fn list_assets(pool: &DbPool, scope: &ListScope) -> Result<Vec<AssetRow>, StoreError> {
    let assets = match scope {
        ListScope::All => {
            sqlx::query_as::<_, AssetRow>("SELECT * FROM assets ORDER BY id")
                .fetch_all(pool)
                .await?
        }
        ListScope::Company(company) => {
            sqlx::query_as::<_, AssetRow>("SELECT * FROM assets WHERE company = ? ORDER BY id")
                .bind(company)
                .fetch_all(pool)
                .await?
        }
    };
    Ok(assets)
}

pub async fn insert_asset(pool: &DbPool, asset: &NewAsset) -> Result<i64, StoreError> {
    let result = sqlx::query(
        "INSERT INTO assets (name, tag_no, company, team, mobile_number, os, model, ram, drive, \
         serial_number, issue_condition, status, purchase_date, peripherals, assigned_emp_id) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&asset.name)
    .bind(&asset.tag_no)
    .bind(&asset.company)
    .bind(&asset.team)
    .bind(&asset.mobile_number)
    .bind(&asset.os)
    .bind(&asset.model)
    .bind(&asset.ram)
    .bind(&asset.drive)
    .bind(&asset.serial_number)
    .bind(&asset.issue_condition)
    .bind(&asset.status)
    .bind(&asset.purchase_date)
    .bind(&asset.peripherals)
    .bind(&asset.assigned_emp_id)
    .execute(pool)
    .await
    .map_err(classify)?;

    Ok(result.last_insert_rowid())
}

pub async fn update_asset(pool: &DbPool, id: i64, asset: &NewAsset) -> Result<(), StoreError> {
    let result = sqlx::query(
        "UPDATE assets SET name = ?, tag_no = ?, company = ?, team = ?, mobile_number = ?, \
         os = ?, model = ?, ram = ?, drive = ?, serial_number = ?, issue_condition = ?, \
         status = ?, purchase_date = ?, peripherals = ?, assigned_emp_id = ? WHERE id = ?",
    )
    .bind(&asset.name)
    .bind(&asset.tag_no)
    .bind(&asset.company)
    .bind(&asset.team)
    .bind(&asset.mobile_number)
    .bind(&asset.os)
    .bind(&asset.model)
    .bind(&asset.ram)
    .bind(&asset.drive)
    .bind(&asset.serial_number)
    .bind(&asset.issue_condition)
    .bind(&asset.status)
    .bind(&asset.purchase_date)
    .bind(&asset.peripherals)
    .bind(&asset.assigned_emp_id)
    .bind(id)
    .execute(pool)
    .await
    .map_err(classify)?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

pub async fn delete_asset(pool: &DbPool, id: i64) -> Result<(), StoreError> {
    let result = sqlx::query("DELETE FROM assets WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tickets
// ---------------------------------------------------------------------------

pub async fn list_tickets(pool: &DbPool) -> Result<Vec<Ticket>, StoreError> {
    let tickets = sqlx::query_as::<_, Ticket>("SELECT * FROM tickets ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(tickets)
}

pub async fn insert_ticket(
    pool: &DbPool,
    emp_id: &str,
    serial_no: &str,
    description: &str,
    status: &str,
) -> Result<i64, StoreError> {
    let result = sqlx::query(
        "INSERT INTO tickets (emp_id, serial_no, description, status) VALUES (?, ?, ?, ?)",
    )
    .bind(emp_id)
    .bind(serial_no)
    .bind(description)
    .bind(status)
    .execute(pool)
    .await
    .map_err(classify)?;

    Ok(result.last_insert_rowid())
}

pub async fn update_ticket_status(pool: &DbPool, id: i64, status: &str) -> Result<(), StoreError> {
    let result = sqlx::query("UPDATE tickets SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn new_employee(emp_id: &str, company: &str) -> NewEmployee {
        NewEmployee {
            username: format!("user-{emp_id}"),
            emp_id: emp_id.to_string(),
            email: format!("{emp_id}@example.com"),
            password_hash: "hash".to_string(),
            company: company.to_string(),
            role: "employee".to_string(),
            team: "Dev".to_string(),
        }
    }

    fn new_asset(tag_no: &str, company: &str) -> NewAsset {
        NewAsset {
            name: "ThinkPad T14".to_string(),
            tag_no: tag_no.to_string(),
            company: company.to_string(),
            team: Some("Dev".to_string()),
            mobile_number: None,
            os: Some("Linux".to_string()),
            model: None,
            ram: Some("32GB".to_string()),
            drive: None,
            serial_number: Some(format!("SN-{tag_no}")),
            issue_condition: None,
            status: "In Stock".to_string(),
            purchase_date: None,
            peripherals: "[]".to_string(),
            assigned_emp_id: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_tag_no_is_classified() {
        let pool = db::init_in_memory().await.unwrap();
        insert_asset(&pool, &new_asset("TAG-1", "MTPL")).await.unwrap();

        let err = insert_asset(&pool, &new_asset("TAG-1", "MTPL"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate));
    }

    #[tokio::test]
    async fn test_update_missing_asset_is_not_found() {
        let pool = db::init_in_memory().await.unwrap();
        let err = update_asset(&pool, 999, &new_asset("TAG-1", "MTPL"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
        assert!(list_assets(&pool, &ListScope::All).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_asset_removes_it_from_listings() {
        let pool = db::init_in_memory().await.unwrap();
        let id = insert_asset(&pool, &new_asset("TAG-1", "MTPL")).await.unwrap();
        insert_asset(&pool, &new_asset("TAG-2", "MTPL")).await.unwrap();

        delete_asset(&pool, id).await.unwrap();

        let remaining = list_assets(&pool, &ListScope::All).await.unwrap();
        assert!(remaining.iter().all(|a| a.id != id));
        assert_eq!(remaining.len(), 1);

        let err = delete_asset(&pool, id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_list_assets_company_scope() {
        let pool = db::init_in_memory().await.unwrap();
        insert_asset(&pool, &new_asset("TAG-1", "MTPL")).await.unwrap();
        insert_asset(&pool, &new_asset("TAG-2", "ACME")).await.unwrap();

        let all = list_assets(&pool, &ListScope::All).await.unwrap();
        assert_eq!(all.len(), 2);

        let scoped = list_assets(&pool, &ListScope::Company("MTPL".to_string()))
            .await
            .unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].tag_no, "TAG-1");
    }

    #[tokio::test]
    async fn test_peripherals_round_trip_preserves_order() {
        let pool = db::init_in_memory().await.unwrap();
        let mut asset = new_asset("TAG-1", "MTPL");
        asset.peripherals = serde_json::to_string(&["Mouse", "Keyboard", "Dock"]).unwrap();
        insert_asset(&pool, &asset).await.unwrap();

        let stored = &list_assets(&pool, &ListScope::All).await.unwrap()[0];
        let parsed: Vec<String> = serde_json::from_str(&stored.peripherals).unwrap();
        assert_eq!(parsed, vec!["Mouse", "Keyboard", "Dock"]);
    }

    #[tokio::test]
    async fn test_employee_login_lookup_with_and_without_team() {
        let pool = db::init_in_memory().await.unwrap();
        insert_employee(&pool, &new_employee("E100", "MTPL")).await.unwrap();

        let found = find_employee_by_login(&pool, "E100@example.com", "MTPL", None)
            .await
            .unwrap();
        assert!(found.is_some());

        let found = find_employee_by_login(&pool, "E100@example.com", "MTPL", Some("Dev"))
            .await
            .unwrap();
        assert!(found.is_some());

        let miss = find_employee_by_login(&pool, "E100@example.com", "MTPL", Some("Sales"))
            .await
            .unwrap();
        assert!(miss.is_none());

        let wrong_company = find_employee_by_login(&pool, "E100@example.com", "ACME", None)
            .await
            .unwrap();
        assert!(wrong_company.is_none());
    }

    #[tokio::test]
    async fn test_update_and_delete_employee() {
        let pool = db::init_in_memory().await.unwrap();
        let id = insert_employee(&pool, &new_employee("E100", "MTPL")).await.unwrap();

        let update = EmployeeUpdate {
            username: "renamed".to_string(),
            emp_id: "E100".to_string(),
            email: "renamed@example.com".to_string(),
            company: "MTPL".to_string(),
            role: "employee".to_string(),
            team: "Support".to_string(),
        };
        update_employee(&pool, id, &update).await.unwrap();

        let employees = list_employees(&pool, &ListScope::All).await.unwrap();
        assert_eq!(employees[0].username, "renamed");
        assert_eq!(employees[0].team, "Support");

        let err = update_employee(&pool, id + 1, &update).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));

        delete_employee(&pool, id).await.unwrap();
        assert!(list_employees(&pool, &ListScope::All).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_employee_contact_tolerates_dangling_emp_id() {
        let pool = db::init_in_memory().await.unwrap();
        let contact = employee_contact(&pool, "NO-SUCH").await.unwrap();
        assert!(contact.is_none());

        insert_employee(&pool, &new_employee("E100", "MTPL")).await.unwrap();
        let (email, username) = employee_contact(&pool, "E100").await.unwrap().unwrap();
        assert_eq!(email, "E100@example.com");
        assert_eq!(username, "user-E100");
    }

    #[tokio::test]
    async fn test_admin_emails_skips_null_addresses() {
        let pool = db::init_in_memory().await.unwrap();
        insert_admin(&pool, "root", "hash", "admin", "MTPL", Some("root@example.com"))
            .await
            .unwrap();
        insert_admin(&pool, "legacy", "hash", "admin", "MTPL", None)
            .await
            .unwrap();

        let emails = admin_emails(&pool).await.unwrap();
        assert_eq!(emails, vec!["root@example.com".to_string()]);
    }

    #[tokio::test]
    async fn test_duplicate_admin_username_is_classified() {
        let pool = db::init_in_memory().await.unwrap();
        insert_admin(&pool, "root", "hash", "admin", "MTPL", None).await.unwrap();

        let err = insert_admin(&pool, "root", "hash", "admin", "ACME", None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate));
    }

    #[tokio::test]
    async fn test_ticket_insert_and_status_update() {
        let pool = db::init_in_memory().await.unwrap();
        let id = insert_ticket(&pool, "E100", "SN-1", "screen flickers", "Open")
            .await
            .unwrap();
        assert!(id > 0);

        update_ticket_status(&pool, id, "Resolved").await.unwrap();
        let tickets = list_tickets(&pool).await.unwrap();
        assert_eq!(tickets[0].status, "Resolved");

        let err = update_ticket_status(&pool, id + 1, "Open").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }
}
