//! Fit/predict contract for seasonal models.

use crate::core::SalesHistory;
use crate::error::Result;
use chrono::NaiveDate;

/// A dated point estimate produced by a fitted model.
pub type Prediction = (NaiveDate, f64);

/// A trend/seasonality estimator that can be fitted to a sales history.
///
/// `fit` takes `&self` and returns an owned fitted model, so one configured
/// model can produce any number of independent fits (the main forecast and
/// the backtest never share fitted state).
pub trait SeasonalModel {
    /// The fitted model produced by [`SeasonalModel::fit`].
    type Fitted: FittedModel;

    /// Fit the model to a history.
    fn fit(&self, history: &SalesHistory) -> Result<Self::Fitted>;

    /// Get the model name.
    fn name(&self) -> &str;
}

/// A fitted model able to predict over its history and beyond.
pub trait FittedModel {
    /// Predict the training dates followed by `horizon_days` consecutive days
    /// after the latest training date, ascending by date.
    fn predict(&self, horizon_days: usize) -> Result<Vec<Prediction>>;
}

impl<M: SeasonalModel + ?Sized> SeasonalModel for &M {
    type Fitted = M::Fitted;

    fn fit(&self, history: &SalesHistory) -> Result<Self::Fitted> {
        (**self).fit(history)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
