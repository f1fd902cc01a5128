//! Stage 2 — actors: employees and customers.
//!
//! Employees carry a plausible org shape: positions drawn from per-department
//! pools, salaries banded by seniority tier, and managers assigned only from
//! earlier, more senior hires (so manager_id always references an existing
//! row). Customers are flat but temporally consistent — last_login never
//! precedes registration_date.

use chrono::Duration;
use rand::rngs::StdRng;
use rand::Rng;

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::model::{round2, Customer, Employee};

use super::providers;
use super::reference::ReferenceData;
use super::unique::UniqueSet;

/// Seniority drives both salary band and who can manage whom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Tier {
    Staff,
    Manager,
    Executive,
}

impl Tier {
    fn salary_range(self) -> (f64, f64) {
        match self {
            Tier::Executive => (120_000.0, 250_000.0),
            Tier::Manager => (70_000.0, 130_000.0),
            Tier::Staff => (40_000.0, 85_000.0),
        }
    }
}

/// Per-department position pools, most junior first. Unknown departments
/// (user-supplied pool names) fall back to the generic set.
fn positions_for(department_name: &str) -> &'static [(&'static str, Tier)] {
    match department_name {
        "Sales" => &[
            ("Sales Representative", Tier::Staff),
            ("Account Executive", Tier::Staff),
            ("Sales Analyst", Tier::Staff),
            ("Sales Manager", Tier::Manager),
            ("VP of Sales", Tier::Executive),
        ],
        "Marketing" => &[
            ("Marketing Specialist", Tier::Staff),
            ("Content Strategist", Tier::Staff),
            ("SEO Analyst", Tier::Staff),
            ("Marketing Manager", Tier::Manager),
            ("VP of Marketing", Tier::Executive),
        ],
        "IT" => &[
            ("Software Engineer", Tier::Staff),
            ("Systems Administrator", Tier::Staff),
            ("Database Administrator", Tier::Staff),
            ("IT Manager", Tier::Manager),
            ("CTO", Tier::Executive),
        ],
        "Human Resources" => &[
            ("HR Specialist", Tier::Staff),
            ("Recruiter", Tier::Staff),
            ("HR Manager", Tier::Manager),
            ("VP of HR", Tier::Executive),
        ],
        "Finance" => &[
            ("Accountant", Tier::Staff),
            ("Financial Analyst", Tier::Staff),
            ("Finance Manager", Tier::Manager),
            ("CFO", Tier::Executive),
        ],
        "Operations" => &[
            ("Operations Analyst", Tier::Staff),
            ("Operations Coordinator", Tier::Staff),
            ("Operations Manager", Tier::Manager),
            ("VP of Operations", Tier::Executive),
        ],
        "Customer Service" => &[
            ("Support Agent", Tier::Staff),
            ("Support Specialist", Tier::Staff),
            ("Support Supervisor", Tier::Manager),
            ("Head of Support", Tier::Executive),
        ],
        "Logistics" => &[
            ("Warehouse Associate", Tier::Staff),
            ("Logistics Coordinator", Tier::Staff),
            ("Logistics Manager", Tier::Manager),
            ("Director of Logistics", Tier::Executive),
        ],
        _ => &[
            ("Associate", Tier::Staff),
            ("Specialist", Tier::Staff),
            ("Analyst", Tier::Staff),
            ("Manager", Tier::Manager),
            ("Director", Tier::Executive),
        ],
    }
}

#[derive(Debug)]
pub struct ActorData {
    pub employees: Vec<Employee>,
    pub customers: Vec<Customer>,
    /// Active employees in sales-adjacent departments, used as the
    /// sales-rep pool for orders. Never empty if any employees exist.
    pub sales_rep_ids: Vec<i64>,
}

pub fn generate(
    config: &GeneratorConfig,
    reference: &ReferenceData,
    rng: &mut StdRng,
) -> Result<ActorData> {
    let employees = generate_employees(config, reference, rng)?;
    let customers = generate_customers(config, rng)?;

    let sales_dept_ids: Vec<i64> = reference
        .departments
        .iter()
        .filter(|d| d.department_name.starts_with("Sales"))
        .map(|d| d.department_id)
        .collect();

    let mut sales_rep_ids: Vec<i64> = employees
        .iter()
        .filter(|e| e.is_active && sales_dept_ids.contains(&e.department_id))
        .map(|e| e.employee_id)
        .collect();
    if sales_rep_ids.is_empty() {
        // No sales department (custom pool) or none active: any active
        // employee can take an order.
        sales_rep_ids = employees
            .iter()
            .filter(|e| e.is_active)
            .map(|e| e.employee_id)
            .collect();
    }
    if sales_rep_ids.is_empty() {
        sales_rep_ids = employees.iter().map(|e| e.employee_id).collect();
    }

    Ok(ActorData {
        employees,
        customers,
        sales_rep_ids,
    })
}

fn generate_employees(
    config: &GeneratorConfig,
    reference: &ReferenceData,
    rng: &mut StdRng,
) -> Result<Vec<Employee>> {
    let base = config.window.base_time();
    let hire_start = (base - Duration::days(config.actors.employment_years as i64 * 365)).date();
    let hire_end = base.date();

    let mut emails = UniqueSet::new();
    let mut employees: Vec<Employee> = Vec::with_capacity(config.counts.employees);
    // (employee_id, tier) of everyone hired so far, for manager lookup
    let mut tiers: Vec<(i64, Tier)> = Vec::with_capacity(config.counts.employees);

    for i in 0..config.counts.employees {
        let department = &reference.departments[rng.random_range(0..reference.departments.len())];
        let pool = positions_for(&department.department_name);
        let (position, tier) = pool[rng.random_range(0..pool.len())];
        let (salary_min, salary_max) = tier.salary_range();

        let first = providers::first_name(rng);
        let last = providers::last_name(rng);
        let email = emails.draw("employees", "email", i, || {
            providers::email_for(rng, &first, &last, "store.example.com")
        })?;

        // Managers come from strictly more senior earlier hires; the first
        // few employees (and all executives) report to nobody.
        let manager_id = if tier == Tier::Executive {
            None
        } else {
            let seniors: Vec<i64> = tiers
                .iter()
                .filter(|(_, t)| *t > tier)
                .map(|(id, _)| *id)
                .collect();
            if seniors.is_empty() {
                None
            } else {
                Some(seniors[rng.random_range(0..seniors.len())])
            }
        };

        let employee_id = i as i64 + 1;
        tiers.push((employee_id, tier));
        employees.push(Employee {
            employee_id,
            first_name: first,
            last_name: last,
            email,
            phone: providers::phone_number(rng),
            hire_date: providers::date_between(rng, hire_start, hire_end),
            department_id: department.department_id,
            position: position.to_string(),
            salary: round2(rng.random_range(salary_min..=salary_max)),
            manager_id,
            is_active: rng.random_bool(config.actors.employee_active_ratio),
        });
    }

    Ok(employees)
}

fn generate_customers(config: &GeneratorConfig, rng: &mut StdRng) -> Result<Vec<Customer>> {
    let base = config.window.base_time();
    let window_start = config.window.window_start(base);

    let mut emails = UniqueSet::new();
    let mut customers = Vec::with_capacity(config.counts.customers);

    for i in 0..config.counts.customers {
        let first = providers::first_name(rng);
        let last = providers::last_name(rng);
        let email = emails.draw("customers", "email", i, || {
            providers::email_for(rng, &first, &last, "example.com")
        })?;

        let registration = providers::datetime_between(rng, window_start, base);
        // last_login in [registration, base] — tenure-consistent
        let last_login = providers::datetime_between(rng, registration, base);

        // Loyalty accrues with account age; longstanding customers hold
        // visibly larger balances.
        let tenure_days = (base - registration).num_days().max(0);
        let loyalty_points = if tenure_days == 0 {
            0
        } else {
            rng.random_range(0..=tenure_days * 5)
        };

        customers.push(Customer {
            customer_id: i as i64 + 1,
            first_name: first,
            last_name: last,
            email,
            phone: providers::phone_number(rng),
            address: providers::street_address(rng),
            city: providers::city(rng),
            state: providers::state(rng),
            country: "USA".to_string(),
            postal_code: providers::postal_code(rng),
            registration_date: registration,
            last_login,
            loyalty_points,
            is_active: rng.random_bool(config.actors.customer_active_ratio),
        });
    }

    Ok(customers)
}
