//! Shared fixtures: in-memory database, engine, one table and a small menu

use rust_decimal::Decimal;

use shared::order::{CreateOrderRequest, OrderItemInput, TableStatus};

use crate::db::DbService;
use crate::db::models::{
    DiningTable, MenuItem, MenuItemStatus, MenuModifierGroup, MenuModifierOption,
};
use crate::db::repository::{DiningTableRepository, MenuItemRepository};
use crate::notify::Notifier;
use crate::orders::{OrderEngine, TableLocks};

pub struct TestContext {
    pub db: DbService,
    pub engine: OrderEngine,
    pub notifier: Notifier,
    pub table_id: String,
    pub salmon: String,
    pub soup: String,
}

pub async fn setup() -> TestContext {
    let db = DbService::in_memory().await.unwrap();
    let notifier = Notifier::new();
    let engine = OrderEngine::new(&db, notifier.clone(), TableLocks::new());

    let tables = DiningTableRepository::new(db.db.clone());
    let table = tables
        .create(DiningTable {
            id: None,
            number: 1,
            capacity: 4,
            location: None,
            status: TableStatus::Available,
            current_order: None,
        })
        .await
        .unwrap();

    let menu = MenuItemRepository::new(db.db.clone());
    let salmon = menu
        .create(MenuItem {
            id: None,
            name: "Grilled Salmon".to_string(),
            price: Decimal::from(18),
            status: MenuItemStatus::Available,
            modifiers: vec![MenuModifierGroup {
                name: "Extras".to_string(),
                options: vec![
                    MenuModifierOption {
                        name: "Extra sauce".to_string(),
                        price_adjustment: Decimal::from(2),
                    },
                    MenuModifierOption {
                        name: "Double portion".to_string(),
                        price_adjustment: Decimal::from(5),
                    },
                ],
            }],
            total_orders: 0,
        })
        .await
        .unwrap();
    let soup = menu
        .create(MenuItem {
            id: None,
            name: "Miso Soup".to_string(),
            price: Decimal::from(6),
            status: MenuItemStatus::Available,
            modifiers: vec![],
            total_orders: 0,
        })
        .await
        .unwrap();

    TestContext {
        table_id: table.id.unwrap().to_string(),
        salmon: salmon.id.unwrap().to_string(),
        soup: soup.id.unwrap().to_string(),
        db,
        engine,
        notifier,
    }
}

pub fn line(menu_item: &str, quantity: u32) -> OrderItemInput {
    OrderItemInput {
        menu_item: menu_item.to_string(),
        quantity,
        modifiers: vec![],
        special_instructions: None,
    }
}

pub fn request(ctx: &TestContext, items: Vec<OrderItemInput>) -> CreateOrderRequest {
    CreateOrderRequest {
        restaurant: "restaurant:main".to_string(),
        table: ctx.table_id.clone(),
        customer: None,
        guest_name: Some("Alex".to_string()),
        items,
    }
}
