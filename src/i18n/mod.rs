//! Translation of raw label keys for display. The ledger and statistics
//! layers only ever store keys; the shell owns a [`Localizer`].

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::errors::LedgerError;
use crate::ledger::month_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    English,
    Russian,
}

impl Locale {
    /// Parses tags like `en-US`, `ru_RU.UTF-8` or `ru`; anything else is English.
    pub fn from_tag(tag: &str) -> Self {
        let language = tag
            .split(|ch: char| ch == '-' || ch == '_' || ch == '.')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "ru" => Locale::Russian,
            _ => Locale::English,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Locale::English => "en-US",
            Locale::Russian => "ru-RU",
        }
    }
}

static RUSSIAN: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Finance management app", "Управление финансами"),
        ("January", "Январь"),
        ("February", "Февраль"),
        ("March", "Март"),
        ("April", "Апрель"),
        ("May", "Май"),
        ("June", "Июнь"),
        ("July", "Июль"),
        ("August", "Август"),
        ("September", "Сентябрь"),
        ("October", "Октябрь"),
        ("November", "Ноябрь"),
        ("December", "Декабрь"),
        ("category", "категория"),
        ("amount", "сумма"),
        ("date", "дата"),
        ("description", "описание"),
        ("subcategory", "подкатегория"),
        ("month", "месяц"),
        ("Expenses by category", "Расходы по категориям"),
        ("Expenses by subcategory", "Расходы по подкатегориям"),
        ("Expenses by date", "Расходы по датам"),
        ("Expenses by month", "Расходы по месяцам"),
        ("Show year statistics", "Показать статистику за год"),
        ("Show month statistics", "Показать статистику за месяц"),
        ("No data to plot", "Нет данных для графика"),
        ("Invalid category name", "Неверное название категории"),
        ("Field not selected", "Поле не выбрано"),
        ("Grid is full", "Сетка заполнена"),
    ])
});

/// Explicit translation context handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Localizer {
    locale: Locale,
}

impl Localizer {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    /// Translation of `key`, or the key itself when the catalog has none.
    pub fn tr<'a>(&self, key: &'a str) -> &'a str {
        match self.locale {
            Locale::English => key,
            Locale::Russian => RUSSIAN.get(key).copied().unwrap_or(key),
        }
    }

    pub fn month_name(&self, month: u32) -> Result<&'static str, LedgerError> {
        Ok(self.tr(month_key(month)?))
    }
}
