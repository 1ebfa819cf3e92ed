//! Hand-written hypotheses appended to every report.

/// Product-facing ideas for reducing fraud.
pub const PRODUCT_HYPOTHESES: [&str; 5] = [
    "Увеличить лимиты проверок для транзакций в ночное время, когда уровень мошенничества выше.",
    "Ввести дополнительные проверки для категорий с высокой долей мошенничества (например, путешествия, развлечения).",
    "Предлагать клиентам уведомления о крупных транзакциях в нестандартное время.",
    "Внедрить гео-проверку для операций за пределами страны клиента.",
    "Использовать машинное обучение для оценки риска в реальном времени.",
];

/// Modelling and data ideas.
pub const TECHNICAL_HYPOTHESES: [&str; 5] = [
    "Добавить больше временных признаков (день недели, праздничный день, сезон).",
    "Интегрировать поведенческие биометрические данные для аутентификации.",
    "Ввести кластеризацию клиентов по типичному паттерну трат.",
    "Обогащать данные о вендорах из внешних источников.",
    "Разрабатывать ансамблевые модели для улучшения точности выявления мошенничества.",
];
