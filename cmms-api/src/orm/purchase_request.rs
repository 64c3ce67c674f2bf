use diesel::prelude::*;

use crate::models::{
    NewPurchaseRequest, PurchaseRequest, PurchaseRequestInput, PurchaseRequestUpdate,
};
use crate::orm::db::last_insert_rowid;

/// Opens a purchase request. Status defaults to `pending`.
pub fn insert_purchase_request(
    conn: &mut SqliteConnection,
    request_input: PurchaseRequestInput,
) -> Result<PurchaseRequest, diesel::result::Error> {
    use crate::schema::purchase_requests::dsl::*;

    let new_request = NewPurchaseRequest {
        spare_part_id: request_input.spare_part_id,
        quantity: request_input.quantity,
        status: request_input.status.unwrap_or_default(),
    };

    diesel::insert_into(purchase_requests)
        .values(&new_request)
        .execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    purchase_requests
        .filter(id.eq(last_id))
        .select(PurchaseRequest::as_select())
        .first(conn)
}

pub fn get_purchase_request_by_id(
    conn: &mut SqliteConnection,
    request_id: i32,
) -> Result<Option<PurchaseRequest>, diesel::result::Error> {
    use crate::schema::purchase_requests::dsl::*;
    purchase_requests
        .filter(id.eq(request_id))
        .select(PurchaseRequest::as_select())
        .first(conn)
        .optional()
}

pub fn get_all_purchase_requests(
    conn: &mut SqliteConnection,
) -> Result<Vec<PurchaseRequest>, diesel::result::Error> {
    use crate::schema::purchase_requests::dsl::*;
    purchase_requests
        .order(id.asc())
        .select(PurchaseRequest::as_select())
        .load(conn)
}

pub fn get_purchase_requests_by_spare_part(
    conn: &mut SqliteConnection,
    spare_id: i32,
) -> Result<Vec<PurchaseRequest>, diesel::result::Error> {
    use crate::schema::purchase_requests::dsl::*;
    purchase_requests
        .filter(spare_part_id.eq(spare_id))
        .order(id.asc())
        .select(PurchaseRequest::as_select())
        .load(conn)
}

/// Updates a purchase request. Any status may follow any other.
pub fn update_purchase_request(
    conn: &mut SqliteConnection,
    request_id: i32,
    changes: PurchaseRequestUpdate,
) -> Result<PurchaseRequest, diesel::result::Error> {
    use crate::schema::purchase_requests::dsl::*;

    let current = purchase_requests
        .filter(id.eq(request_id))
        .select(PurchaseRequest::as_select())
        .first(conn)?;

    diesel::update(purchase_requests.filter(id.eq(request_id)))
        .set((
            spare_part_id.eq(changes.spare_part_id.unwrap_or(current.spare_part_id)),
            quantity.eq(changes.quantity.unwrap_or(current.quantity)),
            status.eq(changes.status.unwrap_or(current.status)),
        ))
        .execute(conn)?;

    purchase_requests
        .filter(id.eq(request_id))
        .select(PurchaseRequest::as_select())
        .first(conn)
}

pub fn delete_purchase_request(
    conn: &mut SqliteConnection,
    request_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::purchase_requests::dsl::*;
    diesel::delete(purchase_requests.filter(id.eq(request_id))).execute(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PurchaseRequestStatus, SparePart, SparePartInput};
    use crate::orm::spare_part::{delete_spare_part, insert_spare_part};
    use crate::orm::testing::setup_test_db;

    fn make_spare(conn: &mut SqliteConnection, spare_code: &str) -> SparePart {
        insert_spare_part(
            conn,
            SparePartInput {
                name: "Filter".to_string(),
                code: spare_code.to_string(),
                make: None,
                model: None,
                description: None,
                stock_quantity: None,
                location: "Store C".to_string(),
                reorder_level: None,
            },
        )
        .expect("Failed to insert spare part")
    }

    #[test]
    fn test_insert_defaults_to_pending() {
        let mut conn = setup_test_db();
        let spare = make_spare(&mut conn, "F-1");

        let request = insert_purchase_request(
            &mut conn,
            PurchaseRequestInput { spare_part_id: spare.id, quantity: 20, status: None },
        )
        .expect("insert");

        assert_eq!(request.status, PurchaseRequestStatus::Pending);
        assert_eq!(request.display(&spare.name), format!("PR-{} for Filter (20)", request.id));
    }

    #[test]
    fn test_any_status_may_follow_any_other() {
        let mut conn = setup_test_db();
        let spare = make_spare(&mut conn, "F-2");
        let request = insert_purchase_request(
            &mut conn,
            PurchaseRequestInput {
                spare_part_id: spare.id,
                quantity: 1,
                status: Some(PurchaseRequestStatus::Received),
            },
        )
        .expect("insert");

        let updated = update_purchase_request(
            &mut conn,
            request.id,
            PurchaseRequestUpdate {
                status: Some(PurchaseRequestStatus::Pending),
                ..Default::default()
            },
        )
        .expect("update");
        assert_eq!(updated.status, PurchaseRequestStatus::Pending);
        assert_eq!(updated.quantity, 1);
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let mut conn = setup_test_db();
        let spare = make_spare(&mut conn, "F-3");

        let result = insert_purchase_request(
            &mut conn,
            PurchaseRequestInput { spare_part_id: spare.id, quantity: -1, status: None },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_filter_by_spare_part_and_cascade() {
        let mut conn = setup_test_db();
        let a = make_spare(&mut conn, "F-A");
        let b = make_spare(&mut conn, "F-B");
        for spare_id in [a.id, a.id, b.id] {
            insert_purchase_request(
                &mut conn,
                PurchaseRequestInput { spare_part_id: spare_id, quantity: 3, status: None },
            )
            .expect("insert");
        }

        assert_eq!(get_purchase_requests_by_spare_part(&mut conn, a.id).expect("list").len(), 2);

        delete_spare_part(&mut conn, a.id).expect("delete spare");
        let remaining = get_all_purchase_requests(&mut conn).expect("list");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].spare_part_id, b.id);

        assert_eq!(delete_purchase_request(&mut conn, remaining[0].id).expect("delete"), 1);
        assert!(get_purchase_request_by_id(&mut conn, remaining[0].id).expect("query").is_none());
    }
}
