mod inventory_item;
mod menu;
mod purchase_order;
mod restaurant;
mod supplier;

pub use inventory_item::{
    InventoryItem, InventoryPatch, InventoryView, StockStatus, LOW_STOCK_THRESHOLD,
};
pub use menu::{Menu, MenuItem, MenuItemView, MenuPatch, MenuView};
pub use purchase_order::{
    OrderLine, OrderLineView, OrderStatus, PurchaseOrder, PurchaseOrderPatch, PurchaseOrderView,
};
pub use restaurant::{Restaurant, RestaurantPatch, RestaurantView};
pub use supplier::{Supplier, SupplierPatch, SupplierView};
