//! Order and trade endpoints

use crate::client::{path_segment, BitgoRestClient};
use crate::error::{RestError, RestResult};
use crate::pagination::PagedRequest;
use crate::types::{Order, OrderQuery, OrderRequest, Trade, TradeQuery};
use tracing::{debug, info, instrument};

/// Order and trade endpoints
pub struct TradingEndpoints<'a> {
    client: &'a BitgoRestClient,
}

impl<'a> TradingEndpoints<'a> {
    pub fn new(client: &'a BitgoRestClient) -> Self {
        Self { client }
    }

    /// List orders of a trading account
    ///
    /// Nothing is requested until the first page is pulled. Each following
    /// page is requested with the previous page's `nextBatchPrevId` as
    /// `prevId`.
    ///
    /// # Arguments
    /// * `account_id` - Trading account id
    /// * `query` - Offset, page size, client order id and date filters
    pub fn list_orders(
        &self,
        account_id: &str,
        query: &OrderQuery,
    ) -> RestResult<PagedRequest<'a, Vec<Order>>> {
        let path = format!("/accounts/{}/orders", path_segment("account_id", account_id)?);
        debug!("Listing orders at {}", path);
        Ok(self.client.paginate(path, query.to_params()))
    }

    /// Place a new market, limit or TWAP order
    ///
    /// Funds for the order are reserved by the venue once it is accepted.
    #[instrument(skip(self, order), fields(product = %order.product, side = %order.side))]
    pub async fn place_order(&self, account_id: &str, order: &OrderRequest) -> RestResult<Order> {
        order.validate().map_err(RestError::InvalidParameter)?;
        let path = format!("/accounts/{}/orders", path_segment("account_id", account_id)?);

        let placed: Order = self.client.post(&path, order).await?;
        info!(order_id = %placed.id, status = %placed.status, "Order placed");
        Ok(placed)
    }

    /// Get a single order by id
    #[instrument(skip(self))]
    pub async fn get_order(&self, account_id: &str, order_id: &str) -> RestResult<Order> {
        let path = format!(
            "/accounts/{}/orders/{}",
            path_segment("account_id", account_id)?,
            path_segment("order_id", order_id)?
        );
        self.client.get(&path, &[]).await
    }

    /// Request cancellation of an order
    ///
    /// Success only means the cancel request was accepted; follow the order
    /// with [`get_order`](Self::get_order) or the orders channel.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, account_id: &str, order_id: &str) -> RestResult<()> {
        let path = format!(
            "/accounts/{}/orders/{}/cancel",
            path_segment("account_id", account_id)?,
            path_segment("order_id", order_id)?
        );
        self.client.put_empty(&path).await?;
        info!("Cancel requested");
        Ok(())
    }

    /// List trades of a trading account, including unsettled ones
    ///
    /// Paginated the same way as [`list_orders`](Self::list_orders).
    pub fn list_trades(
        &self,
        account_id: &str,
        query: &TradeQuery,
    ) -> RestResult<PagedRequest<'a, Vec<Trade>>> {
        let path = format!("/accounts/{}/trades", path_segment("account_id", account_id)?);
        debug!("Listing trades at {}", path);
        Ok(self.client.paginate(path, query.to_params()))
    }

    /// Get a single trade by id
    #[instrument(skip(self))]
    pub async fn get_trade(&self, account_id: &str, trade_id: &str) -> RestResult<Trade> {
        let path = format!(
            "/accounts/{}/trades/{}",
            path_segment("account_id", account_id)?,
            path_segment("trade_id", trade_id)?
        );
        self.client.get(&path, &[]).await
    }
}
