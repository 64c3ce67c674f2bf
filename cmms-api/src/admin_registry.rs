//! Descriptor table for the administrative back-office.
//!
//! Every entity the admin interface manages is listed here once, with the
//! fields an edit form needs (kind, required, unique, choices, default,
//! referenced entity) and the columns shown on its change list. The API
//! serves this table as JSON; `changelist` produces the display rows.

use diesel::prelude::*;
use serde::Serialize;
use ts_rs::TS;

use crate::models::{
    Choice, EquipmentStatus, MaintenanceSchedule, MaintenanceType, PerformanceReport, Priority,
    PurchaseRequest, PurchaseRequestStatus, ReportType, Role, SpareTransaction, TransactionType,
    WorkOrder, WorkOrderStatus,
};
use crate::orm::{
    equipment::get_all_equipment, spare_part::get_all_spare_parts, team::get_all_teams,
    user::get_all_users,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FieldKind {
    Integer,
    Text,
    LongText,
    Email,
    Boolean,
    Date,
    DateTime,
    Choice,
    ForeignKey,
    ManyToMany,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub unique: bool,
    pub read_only: bool,
    pub default: Option<&'static str>,
    pub choices: Vec<Choice>,
    /// Admin path of the referenced entity, for foreign keys.
    pub references: Option<&'static str>,
}

impl FieldDescriptor {
    fn new(name: &'static str, kind: FieldKind) -> Self {
        FieldDescriptor {
            name,
            kind,
            required: false,
            unique: false,
            read_only: false,
            default: None,
            choices: Vec::new(),
            references: None,
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    fn with_default(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    fn choice(name: &'static str, choices: Vec<Choice>) -> Self {
        let mut field = FieldDescriptor::new(name, FieldKind::Choice);
        field.choices = choices;
        field
    }

    fn foreign_key(name: &'static str, references: &'static str) -> Self {
        let mut field = FieldDescriptor::new(name, FieldKind::ForeignKey);
        field.references = Some(references);
        field
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct EntityDescriptor {
    pub name: &'static str,
    pub verbose_name_plural: &'static str,
    /// URL segment under `/api/1/` and `/api/1/admin/`.
    pub path: &'static str,
    pub list_display: Vec<&'static str>,
    /// False for write-once entities.
    pub editable: bool,
    pub fields: Vec<FieldDescriptor>,
}

/// One line of a change list.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct ChangeRow {
    pub id: i32,
    pub display: String,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct ChangeList {
    pub entity: EntityDescriptor,
    pub count: usize,
    pub rows: Vec<ChangeRow>,
}

/// All registered entities, in menu order.
pub fn registry() -> Vec<EntityDescriptor> {
    use FieldKind::{Boolean, Date, DateTime, Email, Integer, LongText, ManyToMany, Text};

    vec![
        EntityDescriptor {
            name: "User",
            verbose_name_plural: "Users",
            path: "Users",
            list_display: vec!["username", "email", "role", "is_staff"],
            editable: true,
            fields: vec![
                FieldDescriptor::new("username", Text).required().unique(),
                FieldDescriptor::new("email", Email),
                FieldDescriptor::new("first_name", Text),
                FieldDescriptor::new("last_name", Text),
                FieldDescriptor::new("password", Text),
                FieldDescriptor::new("is_active", Boolean).with_default("true"),
                FieldDescriptor::new("is_staff", Boolean).with_default("false"),
                FieldDescriptor::new("date_joined", DateTime).read_only(),
                FieldDescriptor::choice("role", Role::choices()).with_default("viewer"),
            ],
        },
        EntityDescriptor {
            name: "Team",
            verbose_name_plural: "Teams",
            path: "Teams",
            list_display: vec!["name", "description"],
            editable: true,
            fields: vec![
                FieldDescriptor::new("name", Text).required().unique(),
                FieldDescriptor::new("description", LongText),
                FieldDescriptor {
                    references: Some("Users"),
                    ..FieldDescriptor::new("members", ManyToMany)
                },
            ],
        },
        EntityDescriptor {
            name: "Equipment",
            verbose_name_plural: "Equipment",
            path: "Equipment",
            list_display: vec!["name", "serial_number", "location", "status"],
            editable: true,
            fields: vec![
                FieldDescriptor::new("name", Text).required(),
                FieldDescriptor::new("equipment_type", Text),
                FieldDescriptor::new("serial_number", Text).required().unique(),
                FieldDescriptor::new("location", Text).required(),
                FieldDescriptor::new("install_date", Date).with_default("today"),
                FieldDescriptor::choice("status", EquipmentStatus::choices())
                    .with_default("active"),
            ],
        },
        EntityDescriptor {
            name: "SparePart",
            verbose_name_plural: "Spare Parts",
            path: "SpareParts",
            list_display: vec!["name", "code", "stock_quantity", "reorder_level", "location"],
            editable: true,
            fields: vec![
                FieldDescriptor::new("name", Text).required(),
                FieldDescriptor::new("code", Text).required().unique(),
                FieldDescriptor::new("make", Text),
                FieldDescriptor::new("model", Text),
                FieldDescriptor::new("description", LongText),
                FieldDescriptor::new("stock_quantity", Integer).with_default("0"),
                FieldDescriptor::new("location", Text).required(),
                FieldDescriptor::new("reorder_level", Integer).with_default("5"),
            ],
        },
        EntityDescriptor {
            name: "SpareTransaction",
            verbose_name_plural: "Spare Transactions",
            path: "SpareTransactions",
            list_display: vec!["spare_part", "transaction_type", "quantity", "timestamp"],
            editable: false,
            fields: vec![
                FieldDescriptor::foreign_key("spare_part_id", "SpareParts").required(),
                FieldDescriptor::new("quantity", Integer).required(),
                FieldDescriptor::choice("transaction_type", TransactionType::choices()).required(),
                FieldDescriptor::foreign_key("requested_by_id", "Users"),
                FieldDescriptor::foreign_key("approved_by_id", "Users"),
                FieldDescriptor::new("timestamp", DateTime).read_only(),
            ],
        },
        EntityDescriptor {
            name: "PurchaseRequest",
            verbose_name_plural: "Purchase Requests",
            path: "PurchaseRequests",
            list_display: vec!["spare_part", "quantity", "status", "created_at"],
            editable: true,
            fields: vec![
                FieldDescriptor::foreign_key("spare_part_id", "SpareParts").required(),
                FieldDescriptor::new("quantity", Integer).required(),
                FieldDescriptor::choice("status", PurchaseRequestStatus::choices())
                    .with_default("pending"),
                FieldDescriptor::new("created_at", DateTime).read_only(),
            ],
        },
        EntityDescriptor {
            name: "MaintenanceSchedule",
            verbose_name_plural: "Maintenance Schedules",
            path: "MaintenanceSchedules",
            list_display: vec!["equipment", "schedule_type", "next_due_date"],
            editable: true,
            fields: vec![
                FieldDescriptor::foreign_key("equipment_id", "Equipment").required(),
                FieldDescriptor::choice("schedule_type", MaintenanceType::choices()).required(),
                FieldDescriptor::new("frequency_days", Integer),
                FieldDescriptor::new("run_hours", Integer),
                FieldDescriptor::new("next_due_date", Date).required(),
            ],
        },
        EntityDescriptor {
            name: "WorkOrder",
            verbose_name_plural: "Work Orders",
            path: "WorkOrders",
            list_display: vec!["number", "equipment", "status", "priority", "assigned_team"],
            editable: true,
            fields: vec![
                FieldDescriptor::new("number", Text).required().unique(),
                FieldDescriptor::foreign_key("equipment_id", "Equipment").required(),
                FieldDescriptor::foreign_key("created_by_id", "Users"),
                FieldDescriptor::foreign_key("assigned_team_id", "Teams"),
                FieldDescriptor::new("description", LongText).required(),
                FieldDescriptor::choice("status", WorkOrderStatus::choices())
                    .with_default("pending"),
                FieldDescriptor::choice("priority", Priority::choices()).with_default("medium"),
                FieldDescriptor::new("created_at", DateTime).read_only(),
                FieldDescriptor::new("updated_at", DateTime).read_only(),
            ],
        },
        EntityDescriptor {
            name: "PerformanceReport",
            verbose_name_plural: "Performance Reports",
            path: "PerformanceReports",
            list_display: vec!["report_type", "equipment", "generated_at"],
            editable: true,
            fields: vec![
                FieldDescriptor::choice("report_type", ReportType::choices()).required(),
                FieldDescriptor::foreign_key("equipment_id", "Equipment").required(),
                FieldDescriptor::new("generated_at", DateTime).read_only(),
                FieldDescriptor::new("content", LongText),
            ],
        },
    ]
}

/// Looks up a descriptor by its path segment (case sensitive).
pub fn find_entity(path: &str) -> Option<EntityDescriptor> {
    registry().into_iter().find(|entity| entity.path == path)
}

/// Change list rows for an entity, rendered with each record's display
/// string. Returns `Ok(None)` for an unknown path.
pub fn changelist(
    conn: &mut SqliteConnection,
    path: &str,
) -> Result<Option<Vec<ChangeRow>>, diesel::result::Error> {
    use crate::schema::{
        equipment, maintenance_schedules, performance_reports, purchase_requests, spare_parts,
        spare_transactions, work_orders,
    };

    fn rows<T: ToString>(items: Vec<T>, id_of: impl Fn(&T) -> i32) -> Vec<ChangeRow> {
        items
            .iter()
            .map(|item| ChangeRow { id: id_of(item), display: item.to_string() })
            .collect()
    }

    let rows = match path {
        "Users" => rows(get_all_users(conn)?, |u| u.id),
        "Teams" => rows(get_all_teams(conn)?, |t| t.id),
        "Equipment" => rows(get_all_equipment(conn)?, |e| e.id),
        "SpareParts" => rows(get_all_spare_parts(conn)?, |s| s.id),
        "SpareTransactions" => spare_transactions::table
            .inner_join(spare_parts::table)
            .order(spare_transactions::id.asc())
            .select((SpareTransaction::as_select(), spare_parts::name))
            .load::<(SpareTransaction, String)>(conn)?
            .into_iter()
            .map(|(tx, part)| ChangeRow { id: tx.id, display: tx.display(&part) })
            .collect(),
        "PurchaseRequests" => purchase_requests::table
            .inner_join(spare_parts::table)
            .order(purchase_requests::id.asc())
            .select((PurchaseRequest::as_select(), spare_parts::name))
            .load::<(PurchaseRequest, String)>(conn)?
            .into_iter()
            .map(|(pr, part)| ChangeRow { id: pr.id, display: pr.display(&part) })
            .collect(),
        "MaintenanceSchedules" => maintenance_schedules::table
            .inner_join(equipment::table)
            .order(maintenance_schedules::id.asc())
            .select((MaintenanceSchedule::as_select(), equipment::name))
            .load::<(MaintenanceSchedule, String)>(conn)?
            .into_iter()
            .map(|(s, eq)| ChangeRow { id: s.id, display: s.display(&eq) })
            .collect(),
        "WorkOrders" => work_orders::table
            .inner_join(equipment::table)
            .order(work_orders::id.asc())
            .select((WorkOrder::as_select(), equipment::name))
            .load::<(WorkOrder, String)>(conn)?
            .into_iter()
            .map(|(wo, eq)| ChangeRow { id: wo.id, display: wo.display(&eq) })
            .collect(),
        "PerformanceReports" => performance_reports::table
            .inner_join(equipment::table)
            .order(performance_reports::id.asc())
            .select((PerformanceReport::as_select(), equipment::name))
            .load::<(PerformanceReport, String)>(conn)?
            .into_iter()
            .map(|(r, eq)| ChangeRow { id: r.id, display: r.display(&eq) })
            .collect(),
        _ => return Ok(None),
    };

    Ok(Some(rows))
}
