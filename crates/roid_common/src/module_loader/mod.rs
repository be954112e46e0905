pub mod task_result;

use roid_error::BuildDiagnostic;

use self::task_result::NormalModuleTaskResult;

pub enum ModuleLoaderMsg {
  NormalModuleDone(NormalModuleTaskResult),
  BuildErrors(Vec<BuildDiagnostic>),
}
