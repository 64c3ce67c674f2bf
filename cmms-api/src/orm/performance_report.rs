use diesel::prelude::*;

use crate::models::{
    NewPerformanceReport, PerformanceReport, PerformanceReportInput, PerformanceReportUpdate,
};
use crate::orm::db::last_insert_rowid;

/// Stores a report. `generated_at` is stamped by the database.
pub fn insert_performance_report(
    conn: &mut SqliteConnection,
    report_input: PerformanceReportInput,
) -> Result<PerformanceReport, diesel::result::Error> {
    use crate::schema::performance_reports::dsl::*;

    let new_report = NewPerformanceReport {
        report_type: report_input.report_type,
        equipment_id: report_input.equipment_id,
        content: report_input.content,
    };

    diesel::insert_into(performance_reports)
        .values(&new_report)
        .execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    performance_reports
        .filter(id.eq(last_id))
        .select(PerformanceReport::as_select())
        .first(conn)
}

pub fn get_performance_report_by_id(
    conn: &mut SqliteConnection,
    report_id: i32,
) -> Result<Option<PerformanceReport>, diesel::result::Error> {
    use crate::schema::performance_reports::dsl::*;
    performance_reports
        .filter(id.eq(report_id))
        .select(PerformanceReport::as_select())
        .first(conn)
        .optional()
}

pub fn get_all_performance_reports(
    conn: &mut SqliteConnection,
) -> Result<Vec<PerformanceReport>, diesel::result::Error> {
    use crate::schema::performance_reports::dsl::*;
    performance_reports
        .order(id.asc())
        .select(PerformanceReport::as_select())
        .load(conn)
}

/// Reports for one piece of equipment, newest first.
pub fn get_reports_by_equipment(
    conn: &mut SqliteConnection,
    equipment: i32,
) -> Result<Vec<PerformanceReport>, diesel::result::Error> {
    use crate::schema::performance_reports::dsl::*;
    performance_reports
        .filter(equipment_id.eq(equipment))
        .order((generated_at.desc(), id.desc()))
        .select(PerformanceReport::as_select())
        .load(conn)
}

pub fn update_performance_report(
    conn: &mut SqliteConnection,
    report_id: i32,
    changes: PerformanceReportUpdate,
) -> Result<PerformanceReport, diesel::result::Error> {
    use crate::schema::performance_reports::dsl::*;

    let current = performance_reports
        .filter(id.eq(report_id))
        .select(PerformanceReport::as_select())
        .first(conn)?;

    diesel::update(performance_reports.filter(id.eq(report_id)))
        .set((
            report_type.eq(changes.report_type.unwrap_or(current.report_type)),
            equipment_id.eq(changes.equipment_id.unwrap_or(current.equipment_id)),
            content.eq(changes.content.unwrap_or(current.content)),
        ))
        .execute(conn)?;

    performance_reports
        .filter(id.eq(report_id))
        .select(PerformanceReport::as_select())
        .first(conn)
}

pub fn delete_performance_report(
    conn: &mut SqliteConnection,
    report_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::performance_reports::dsl::*;
    diesel::delete(performance_reports.filter(id.eq(report_id))).execute(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Equipment, EquipmentInput, ReportType};
    use crate::orm::equipment::{delete_equipment, insert_equipment};
    use crate::orm::testing::setup_test_db;

    fn make_equipment(conn: &mut SqliteConnection) -> Equipment {
        insert_equipment(
            conn,
            EquipmentInput {
                name: "Press".to_string(),
                equipment_type: Some("Hydraulic".to_string()),
                serial_number: "PR-100".to_string(),
                location: "Line 3".to_string(),
                install_date: None,
                status: None,
            },
        )
        .expect("Failed to insert equipment")
    }

    #[test]
    fn test_insert_and_display() {
        let mut conn = setup_test_db();
        let eq = make_equipment(&mut conn);

        let report = insert_performance_report(
            &mut conn,
            PerformanceReportInput {
                report_type: ReportType::Oee,
                equipment_id: eq.id,
                content: Some("OEE 82%".to_string()),
            },
        )
        .expect("insert");

        assert_eq!(report.content.as_deref(), Some("OEE 82%"));
        let expected = format!("oee Report for Press on {}", report.generated_at.format("%Y-%m-%d"));
        assert_eq!(report.display(&eq.name), expected);
    }

    #[test]
    fn test_unknown_report_type_rejected_by_store() {
        let mut conn = setup_test_db();
        let eq = make_equipment(&mut conn);

        let result = diesel::sql_query(format!(
            "INSERT INTO performance_reports (report_type, equipment_id) VALUES ('weekly', {})",
            eq.id
        ))
        .execute(&mut conn);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_clears_content() {
        let mut conn = setup_test_db();
        let eq = make_equipment(&mut conn);
        let report = insert_performance_report(
            &mut conn,
            PerformanceReportInput {
                report_type: ReportType::Shutdown,
                equipment_id: eq.id,
                content: Some("draft".to_string()),
            },
        )
        .expect("insert");

        let updated = update_performance_report(
            &mut conn,
            report.id,
            PerformanceReportUpdate { content: Some(None), ..Default::default() },
        )
        .expect("update");
        assert_eq!(updated.content, None);
        assert_eq!(updated.report_type, ReportType::Shutdown);
        assert_eq!(updated.generated_at, report.generated_at);
    }

    #[test]
    fn test_reports_follow_equipment() {
        let mut conn = setup_test_db();
        let eq = make_equipment(&mut conn);
        for kind in [ReportType::Availability, ReportType::Reliability] {
            insert_performance_report(
                &mut conn,
                PerformanceReportInput { report_type: kind, equipment_id: eq.id, content: None },
            )
            .expect("insert");
        }
        assert_eq!(get_reports_by_equipment(&mut conn, eq.id).expect("list").len(), 2);

        delete_equipment(&mut conn, eq.id).expect("delete equipment");
        assert!(get_all_performance_reports(&mut conn).expect("list").is_empty());
    }

    #[test]
    fn test_delete_report() {
        let mut conn = setup_test_db();
        let eq = make_equipment(&mut conn);
        let report = insert_performance_report(
            &mut conn,
            PerformanceReportInput {
                report_type: ReportType::PartReplacement,
                equipment_id: eq.id,
                content: None,
            },
        )
        .expect("insert");

        assert_eq!(delete_performance_report(&mut conn, report.id).expect("delete"), 1);
        assert!(get_performance_report_by_id(&mut conn, report.id).expect("query").is_none());
    }
}
