//! Spare transactions are a ledger: rows are inserted, read and deleted but
//! never updated. The trigger `spare_transactions_immutable` rejects updates
//! to everything except the user references.

use diesel::prelude::*;

use crate::models::{NewSpareTransaction, SpareTransaction, SpareTransactionInput};
use crate::orm::db::last_insert_rowid;

/// Records a spare part movement. The timestamp is assigned by the store.
pub fn insert_spare_transaction(
    conn: &mut SqliteConnection,
    transaction_input: SpareTransactionInput,
) -> Result<SpareTransaction, diesel::result::Error> {
    use crate::schema::spare_transactions::dsl::*;

    let new_transaction = NewSpareTransaction {
        spare_part_id: transaction_input.spare_part_id,
        quantity: transaction_input.quantity,
        transaction_type: transaction_input.transaction_type,
        requested_by_id: transaction_input.requested_by_id,
        approved_by_id: transaction_input.approved_by_id,
    };

    diesel::insert_into(spare_transactions)
        .values(&new_transaction)
        .execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    spare_transactions
        .filter(id.eq(last_id))
        .select(SpareTransaction::as_select())
        .first(conn)
}

pub fn get_spare_transaction_by_id(
    conn: &mut SqliteConnection,
    transaction_id: i32,
) -> Result<Option<SpareTransaction>, diesel::result::Error> {
    use crate::schema::spare_transactions::dsl::*;
    spare_transactions
        .filter(id.eq(transaction_id))
        .select(SpareTransaction::as_select())
        .first(conn)
        .optional()
}

pub fn get_all_spare_transactions(
    conn: &mut SqliteConnection,
) -> Result<Vec<SpareTransaction>, diesel::result::Error> {
    use crate::schema::spare_transactions::dsl::*;
    spare_transactions
        .order(id.asc())
        .select(SpareTransaction::as_select())
        .load(conn)
}

/// Ledger of a single spare part, oldest first.
pub fn get_transactions_by_spare_part(
    conn: &mut SqliteConnection,
    spare_id: i32,
) -> Result<Vec<SpareTransaction>, diesel::result::Error> {
    use crate::schema::spare_transactions::dsl::*;
    spare_transactions
        .filter(spare_part_id.eq(spare_id))
        .order(id.asc())
        .select(SpareTransaction::as_select())
        .load(conn)
}

pub fn delete_spare_transaction(
    conn: &mut SqliteConnection,
    transaction_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::spare_transactions::dsl::*;
    diesel::delete(spare_transactions.filter(id.eq(transaction_id))).execute(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SparePart, SparePartInput, TransactionType, User, UserInput};
    use crate::orm::spare_part::{delete_spare_part, insert_spare_part};
    use crate::orm::testing::setup_test_db;
    use crate::orm::user::{delete_user, insert_user};

    fn make_spare(conn: &mut SqliteConnection) -> SparePart {
        insert_spare_part(
            conn,
            SparePartInput {
                name: "V-Belt".to_string(),
                code: "VB-A42".to_string(),
                make: None,
                model: None,
                description: None,
                stock_quantity: Some(10),
                location: "Store B".to_string(),
                reorder_level: None,
            },
        )
        .expect("Failed to insert spare part")
    }

    fn make_user(conn: &mut SqliteConnection, username: &str) -> User {
        insert_user(
            conn,
            UserInput {
                username: username.to_string(),
                email: None,
                first_name: None,
                last_name: None,
                password: None,
                is_active: None,
                is_staff: None,
                role: None,
            },
        )
        .expect("Failed to insert user")
    }

    fn issue(spare_id: i32, requester: Option<i32>, approver: Option<i32>) -> SpareTransactionInput {
        SpareTransactionInput {
            spare_part_id: spare_id,
            quantity: 2,
            transaction_type: TransactionType::Issue,
            requested_by_id: requester,
            approved_by_id: approver,
        }
    }

    #[test]
    fn test_insert_sets_timestamp() {
        let mut conn = setup_test_db();
        let spare = make_spare(&mut conn);

        let tx = insert_spare_transaction(&mut conn, issue(spare.id, None, None)).expect("insert");
        assert_eq!(tx.quantity, 2);
        assert_eq!(tx.transaction_type, TransactionType::Issue);

        let expected = format!("issue - V-Belt - Qty: 2 on {}", tx.timestamp.format("%Y-%m-%d %H:%M"));
        assert_eq!(tx.display(&spare.name), expected);
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let mut conn = setup_test_db();
        let spare = make_spare(&mut conn);

        let mut input = issue(spare.id, None, None);
        input.quantity = -4;
        assert!(insert_spare_transaction(&mut conn, input).is_err());
    }

    #[test]
    fn test_rows_cannot_be_modified() {
        let mut conn = setup_test_db();
        let spare = make_spare(&mut conn);
        let tx = insert_spare_transaction(&mut conn, issue(spare.id, None, None)).expect("insert");

        use crate::schema::spare_transactions::dsl as st;
        let result = diesel::update(st::spare_transactions.filter(st::id.eq(tx.id)))
            .set(st::quantity.eq(99))
            .execute(&mut conn);
        assert!(result.is_err());

        let result = diesel::update(st::spare_transactions.filter(st::id.eq(tx.id)))
            .set(st::timestamp.eq(chrono::NaiveDate::from_ymd_opt(2000, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()))
            .execute(&mut conn);
        assert!(result.is_err());

        let reloaded = get_spare_transaction_by_id(&mut conn, tx.id).expect("query").expect("exists");
        assert_eq!(reloaded, tx);
    }

    #[test]
    fn test_deleting_user_nulls_references_but_keeps_row() {
        let mut conn = setup_test_db();
        let spare = make_spare(&mut conn);
        let requester = make_user(&mut conn, "requester");
        let approver = make_user(&mut conn, "approver");

        let tx = insert_spare_transaction(
            &mut conn,
            issue(spare.id, Some(requester.id), Some(approver.id)),
        )
        .expect("insert");

        delete_user(&mut conn, requester.id).expect("delete requester");

        let reloaded = get_spare_transaction_by_id(&mut conn, tx.id).expect("query").expect("kept");
        assert_eq!(reloaded.requested_by_id, None);
        assert_eq!(reloaded.approved_by_id, Some(approver.id));
        assert_eq!(reloaded.quantity, tx.quantity);
        assert_eq!(reloaded.timestamp, tx.timestamp);
    }

    #[test]
    fn test_deleting_spare_part_cascades() {
        let mut conn = setup_test_db();
        let spare = make_spare(&mut conn);
        insert_spare_transaction(&mut conn, issue(spare.id, None, None)).expect("one");
        insert_spare_transaction(&mut conn, issue(spare.id, None, None)).expect("two");
        assert_eq!(get_transactions_by_spare_part(&mut conn, spare.id).expect("list").len(), 2);

        delete_spare_part(&mut conn, spare.id).expect("delete spare");
        assert!(get_all_spare_transactions(&mut conn).expect("list").is_empty());
    }

    #[test]
    fn test_unknown_spare_part_rejected() {
        let mut conn = setup_test_db();
        assert!(insert_spare_transaction(&mut conn, issue(4242, None, None)).is_err());
    }

    #[test]
    fn test_delete_transaction() {
        let mut conn = setup_test_db();
        let spare = make_spare(&mut conn);
        let tx = insert_spare_transaction(&mut conn, issue(spare.id, None, None)).expect("insert");

        assert_eq!(delete_spare_transaction(&mut conn, tx.id).expect("delete"), 1);
        assert!(get_spare_transaction_by_id(&mut conn, tx.id).expect("query").is_none());
    }
}
