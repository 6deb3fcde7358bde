use curlpress::error::AppResult;

fn main() -> AppResult<()> {
    curlpress::entry::run()
}
