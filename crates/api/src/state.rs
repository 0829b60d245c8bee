use hrkit_auth::AuthService;
use hrkit_storage::EmployeeService;

/// Application state shared across all handlers
pub struct AppState {
    pub auth_service: AuthService,
    pub employee_service: EmployeeService,
    /// Require a valid bearer token on the employee routes
    pub protect_employee_routes: bool,
}

impl AppState {
    pub fn new(auth_service: AuthService, employee_service: EmployeeService) -> Self {
        Self {
            auth_service,
            employee_service,
            protect_employee_routes: false,
        }
    }

    pub fn with_protected_employee_routes(mut self, protect: bool) -> Self {
        self.protect_employee_routes = protect;
        self
    }
}
