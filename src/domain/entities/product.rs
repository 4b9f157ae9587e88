use serde::{Deserialize, Serialize};

use crate::domain::entities::form::{Editable, FieldErrors, FieldReader, FormField, FormValues};
use crate::domain::entities::record::{FieldValue, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductStatus {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl ProductStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductStatus::InStock => "In Stock",
            ProductStatus::OutOfStock => "Out of Stock",
        }
    }

    pub fn for_stock(stock: u32) -> Self {
        if stock > 0 {
            ProductStatus::InStock
        } else {
            ProductStatus::OutOfStock
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub code: String,
    pub title: String,
    pub price: f64,
    pub stock: u32,
    pub category: String,
    pub status: ProductStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub code: String,
    pub title: String,
    pub price: f64,
    pub stock: u32,
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub code: Option<String>,
    pub title: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<u32>,
    pub category: Option<String>,
}

impl Record for Product {
    type Draft = NewProduct;
    type Patch = ProductPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        let value = match key {
            "id" => FieldValue::from(self.id.as_str()),
            "code" => FieldValue::from(self.code.as_str()),
            "title" => FieldValue::from(self.title.as_str()),
            "price" => FieldValue::Decimal(self.price),
            "stock" => FieldValue::Integer(i64::from(self.stock)),
            "category" => FieldValue::from(self.category.as_str()),
            "status" => FieldValue::from(self.status.as_str()),
            _ => return None,
        };
        Some(value)
    }

    fn searchable_fields() -> &'static [&'static str] {
        &["title", "code", "category"]
    }

    fn from_draft(id: String, draft: NewProduct) -> Self {
        Self {
            id,
            status: ProductStatus::for_stock(draft.stock),
            code: draft.code,
            title: draft.title,
            price: draft.price,
            stock: draft.stock,
            category: draft.category,
        }
    }

    fn apply_patch(&mut self, patch: ProductPatch) {
        if let Some(code) = patch.code {
            self.code = code;
        }
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
            self.status = ProductStatus::for_stock(stock);
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
    }
}

const PRODUCT_FORM: &[FormField] = &[
    FormField::text("code", "Product Code"),
    FormField::text("title", "Product Title"),
    FormField::number("price", "Price"),
    FormField::number("stock", "Stock"),
    FormField::text("category", "Category"),
];

struct ProductFields {
    code: Option<String>,
    title: Option<String>,
    price: Option<f64>,
    stock: Option<u32>,
    category: Option<String>,
}

fn read_product_fields(reader: &mut FieldReader<'_>) -> ProductFields {
    ProductFields {
        code: reader.text("code", 1, "Product code is required"),
        title: reader.text("title", 3, "Title must be at least 3 characters"),
        price: reader.positive_decimal("price", "Price must be a positive number"),
        stock: reader.count("stock", "Stock must be a whole number, zero or more"),
        category: reader.text("category", 2, "Category is required"),
    }
}

impl Editable for Product {
    fn form_fields() -> &'static [FormField] {
        PRODUCT_FORM
    }

    fn form_values(&self) -> FormValues {
        [
            ("code", self.code.clone()),
            ("title", self.title.clone()),
            ("price", self.price.to_string()),
            ("stock", self.stock.to_string()),
            ("category", self.category.clone()),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
    }

    fn parse_draft(values: &FormValues) -> Result<NewProduct, FieldErrors> {
        let mut reader = FieldReader::new(values);
        let fields = read_product_fields(&mut reader);
        let code = reader.require("code", fields.code);
        let title = reader.require("title", fields.title);
        let price = reader.require("price", fields.price);
        let stock = reader.require("stock", fields.stock);
        let category = reader.require("category", fields.category);
        let draft = match (code, title, price, stock, category) {
            (Some(code), Some(title), Some(price), Some(stock), Some(category)) => {
                Some(NewProduct {
                    code,
                    title,
                    price,
                    stock,
                    category,
                })
            }
            _ => None,
        };
        reader.finish_complete(draft)
    }

    fn parse_patch(values: &FormValues) -> Result<ProductPatch, FieldErrors> {
        let mut reader = FieldReader::new(values);
        let fields = read_product_fields(&mut reader);
        reader.finish(ProductPatch {
            code: fields.code,
            title: fields.title,
            price: fields.price,
            stock: fields.stock,
            category: fields.category,
        })
    }
}
