/// eng
/// Error type shared by the whole crate. The formula engine itself only ever returns
/// `CalcError::InvalidInput`, the other variants come from the catalogue, settings and export.
/// ----------------------------------------------------------------
/// ru
/// Тип ошибки, общий для всего крейта. Сами формулы возвращают только `CalcError::InvalidInput`,
/// остальные варианты возникают при загрузке справочника, настроек и экспорте.
pub mod calc_error;
/// eng
/// Pure formulas converting between volume, molar concentration, molar mass and mass,
/// relative error in percent and the volume correction. The `FormulaSet` trait lets the
/// calculator be built with another bundle of formulas.
/// ----------------------------------------------------------------
/// ru
/// Чистые функции пересчёта между объёмом, молярной концентрацией, молярной массой и массой,
/// относительная погрешность в процентах и поправка объёма. Трейт `FormulaSet` позволяет
/// создать калькулятор с другим набором формул.
pub mod formulas;
/// eng
/// Calculator on top of the formulas: validates requests, formats the numbers for display
/// and processes several substances at once.
/// ----------------------------------------------------------------
/// ru
/// Калькулятор поверх формул: проверяет входные данные, форматирует числа для вывода
/// и считает сразу несколько веществ.
pub mod calculator;
/// eng
/// Units of volume and mass accepted from the user and their conversion to ml and g
/// ----------------------------------------------------------------
/// ru
/// Единицы объёма и массы и их пересчёт в мл и г
pub mod units;
/// eng
/// Molar mass of a substance from its chemical formula, e.g. "C9H18O5S" (IPTG)
/// ----------------------------------------------------------------
/// ru
/// Молярная масса вещества по его брутто-формуле, например "C9H18O5S" (IPTG)
pub mod molmass;
