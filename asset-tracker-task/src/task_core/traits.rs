use anyhow::Result;

#[allow(async_fn_in_trait)]
pub trait Executable {
    type Output;

    // 执行任务
    async fn execute(&self) -> Result<Self::Output>;
}
